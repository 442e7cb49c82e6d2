//! Bundled prompt templates.
//!
//! Templates are embedded in the binary using include_str! and can be
//! overridden per template by dropping `<name>.j2` into the configured prompt
//! directory.

use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

pub const RESEARCH: &str = "research";
pub const CONTENT_PLAN: &str = "content_plan";
pub const COMPETITION: &str = "competition";
pub const ARTICLE: &str = "article";

/// Every template the service renders
pub const TEMPLATE_NAMES: &[&str] = &[RESEARCH, CONTENT_PLAN, COMPETITION, ARTICLE];

pub const DEFAULT_RESEARCH_PROMPT: &str = include_str!("../prompts/research.j2");
pub const DEFAULT_CONTENT_PLAN_PROMPT: &str = include_str!("../prompts/content_plan.j2");
pub const DEFAULT_COMPETITION_PROMPT: &str = include_str!("../prompts/competition.j2");
pub const DEFAULT_ARTICLE_PROMPT: &str = include_str!("../prompts/article.j2");

pub const RESEARCH_SYSTEM: &str = "You are a content research expert.";
pub const PLANNING_SYSTEM: &str = "You are a content planning expert.";
pub const STRATEGY_SYSTEM: &str = "You are a content strategy expert.";
pub const WRITER_SYSTEM: &str = "You are a professional content writer specializing in creating engaging, well-researched blog posts.";

/// Where a template was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Bundled(&'static str),
}

impl TemplateSource {
    pub fn content(&self) -> std::io::Result<String> {
        match self {
            TemplateSource::File(path) => std::fs::read_to_string(path),
            TemplateSource::Bundled(content) => Ok((*content).to_string()),
        }
    }
}

fn bundled(name: &str) -> &'static str {
    match name {
        RESEARCH => DEFAULT_RESEARCH_PROMPT,
        CONTENT_PLAN => DEFAULT_CONTENT_PLAN_PROMPT,
        COMPETITION => DEFAULT_COMPETITION_PROMPT,
        _ => DEFAULT_ARTICLE_PROMPT,
    }
}

/// Resolve a template, preferring `<dir>/<name>.j2` over the bundled copy.
pub fn resolve_template(dir: Option<&Path>, name: &str) -> TemplateSource {
    if let Some(dir) = dir {
        let path = dir.join(format!("{name}.j2"));
        if path.exists() {
            debug!("Using prompt override: {:?}", path);
            return TemplateSource::File(path);
        }
    }
    TemplateSource::Bundled(bundled(name))
}

/// Compiled prompt templates
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    /// Library with only the bundled templates
    pub fn bundled() -> Result<Self> {
        Self::load(None)
    }

    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut env = Environment::new();
        for name in TEMPLATE_NAMES {
            let source = resolve_template(dir, name).content()?;
            env.add_template_owned(*name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_bundled_templates_not_empty() {
        for name in TEMPLATE_NAMES {
            assert!(!bundled(name).is_empty(), "{name} is empty");
        }
    }

    #[test]
    fn test_render_research_prompt() {
        let library = PromptLibrary::bundled().unwrap();
        let prompt = library
            .render(RESEARCH, context! { count => 8, niche => "personal finance" })
            .unwrap();
        assert!(prompt.contains("Suggest 8 blog post topics in the personal finance niche."));
        assert!(prompt.contains("\"topics\""));
    }

    #[test]
    fn test_render_article_prompt_with_empty_keywords() {
        let library = PromptLibrary::bundled().unwrap();
        let prompt = library
            .render(
                ARTICLE,
                context! {
                    content_type => "blog_post",
                    topic => "Index funds",
                    word_guide => "800-1200 words",
                    tone => "casual",
                    keywords => "",
                },
            )
            .unwrap();
        assert!(prompt.starts_with("Write a blog_post about Index funds."));
        assert!(prompt.contains("Include these keywords naturally: \n"));
    }

    #[test]
    fn test_resolve_template_bundled_fallback() {
        let source = resolve_template(Some(Path::new("/nonexistent")), RESEARCH);
        assert_eq!(source, TemplateSource::Bundled(DEFAULT_RESEARCH_PROMPT));
    }

    #[test]
    fn test_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("research.j2"), "Topics about {{ niche }}").unwrap();

        let source = resolve_template(Some(dir.path()), RESEARCH);
        assert!(matches!(source, TemplateSource::File(_)));

        let library = PromptLibrary::load(Some(dir.path())).unwrap();
        let prompt = library
            .render(RESEARCH, context! { niche => "gardening", count => 3 })
            .unwrap();
        assert_eq!(prompt, "Topics about gardening");

        // Templates without an override still come from the bundle
        let plan = library
            .render(CONTENT_PLAN, context! { title => "T", keywords => "a, b" })
            .unwrap();
        assert!(plan.contains("Create a detailed content plan for: T"));
    }
}

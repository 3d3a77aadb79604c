use crate::config::CommentsConfig;
use crate::domain::model::PaperEntity;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "paper-comments")]
#[command(about = "Fetch and render community comments for an arXiv paper")]
pub struct CliArgs {
    #[arg(long, help = "arXiv identifier, with or without the 'arxiv:' prefix")]
    pub arxiv: Option<String>,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "en", help = "Display language ('zh-CN' for Chinese)")]
    pub lang: String,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn load_config(&self) -> Result<CommentsConfig> {
        match &self.config {
            Some(path) => CommentsConfig::from_file(path),
            None => Ok(CommentsConfig::default()),
        }
    }

    pub fn paper(&self) -> PaperEntity {
        PaperEntity::new(self.title.clone(), self.arxiv.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = CliArgs::parse_from(["paper-comments", "--arxiv", "arxiv:2406.07394", "--lang", "zh-CN"]);
        assert_eq!(args.lang, "zh-CN");
        assert_eq!(args.paper().identifier().unwrap().as_str(), "2406.07394");
        assert_eq!(args.load_config().unwrap(), CommentsConfig::default());

        let args = CliArgs::parse_from(["paper-comments"]);
        assert!(args.paper().identifier().is_none());
        assert_eq!(args.lang, "en");
    }
}

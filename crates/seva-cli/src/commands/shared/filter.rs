use seva_core::filters::IssueFilter;

use super::parse::parse_opt_enum;
use crate::cli::subcommands::issue::IssueFilterArgs;

pub fn issue_filter(args: &IssueFilterArgs) -> anyhow::Result<IssueFilter> {
    Ok(IssueFilter {
        status: parse_opt_enum(args.status.as_deref(), "status")?,
        priority: parse_opt_enum(args.priority.as_deref(), "priority")?,
        ward: args.ward.clone(),
        reporter: args.reporter.clone(),
        category: parse_opt_enum(args.category.as_deref(), "category")?,
    })
}

#[cfg(test)]
mod tests {
    use seva_core::enums::{IssueCategory, IssueStatus};

    use super::*;

    #[test]
    fn flags_become_filter() {
        let args = IssueFilterArgs {
            status: Some("open".into()),
            category: Some("water".into()),
            ward: Some("Ward 5".into()),
            ..IssueFilterArgs::default()
        };
        let filter = issue_filter(&args).unwrap();
        assert_eq!(filter.status, Some(IssueStatus::Open));
        assert_eq!(filter.category, Some(IssueCategory::Water));
        assert_eq!(filter.ward.as_deref(), Some("Ward 5"));
        assert!(filter.priority.is_none());
    }

    #[test]
    fn bad_priority_names_the_flag() {
        let args = IssueFilterArgs {
            priority: Some("critical".into()),
            ..IssueFilterArgs::default()
        };
        let err = issue_filter(&args).unwrap_err();
        assert!(err.to_string().contains("priority"));
    }
}

use crate::config::parse_flag;
use crate::query::{featured::DEFAULT_FEATURED_LIMIT, QueryOptions, SortKey};
use crate::{Error, Result};
use serde::Deserialize;

/// Query parameters are taken as raw strings so each malformed value is
/// reported with its parameter name and accepted forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryParams {
    pub include_forks: Option<String>,
    /// Comma-separated language names
    pub languages: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub force_refresh: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshParams {
    pub force_refresh: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedParams {
    pub limit: Option<String>,
    pub force_refresh: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse `true`/`false`/`1`/`0` (any case); absent or empty yields `default`
pub fn parse_bool(name: &str, value: Option<&str>, default: bool) -> Result<bool> {
    match present(value) {
        None => Ok(default),
        Some(v) => parse_flag(v).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Invalid value for '{name}': '{v}'. Expected true, false, 1 or 0"
            ))
        }),
    }
}

pub fn parse_int(name: &str, value: Option<&str>) -> Result<Option<i64>> {
    present(value)
        .map(|v| {
            v.parse::<i64>().map_err(|_| {
                Error::InvalidParameter(format!("Invalid value for '{name}': '{v}'. Expected an integer"))
            })
        })
        .transpose()
}

/// Split a comma-separated list, dropping blanks; `None` when nothing is left
pub fn parse_languages(value: Option<&str>) -> Option<Vec<String>> {
    let languages: Vec<String> = value?
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    (!languages.is_empty()).then_some(languages)
}

impl RepositoryParams {
    pub fn query_options(&self) -> Result<QueryOptions> {
        let sort = match present(self.sort.as_deref()) {
            Some(sort) => sort.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        Ok(QueryOptions {
            include_forks: parse_bool("include_forks", self.include_forks.as_deref(), false)?,
            languages: parse_languages(self.languages.as_deref()),
            sort,
            limit: parse_int("limit", self.limit.as_deref())?,
        })
    }

    pub fn force_refresh(&self) -> Result<bool> {
        parse_bool("force_refresh", self.force_refresh.as_deref(), false)
    }
}

impl RefreshParams {
    pub fn force_refresh(&self) -> Result<bool> {
        parse_bool("force_refresh", self.force_refresh.as_deref(), false)
    }
}

impl FeaturedParams {
    pub fn limit(&self) -> Result<i64> {
        Ok(parse_int("limit", self.limit.as_deref())?.unwrap_or(DEFAULT_FEATURED_LIMIT))
    }

    pub fn force_refresh(&self) -> Result<bool> {
        parse_bool("force_refresh", self.force_refresh.as_deref(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("x", Some("TRUE"), false).unwrap());
        assert!(parse_bool("x", Some("1"), false).unwrap());
        assert!(!parse_bool("x", Some("False"), true).unwrap());
        assert!(!parse_bool("x", Some("0"), true).unwrap());
        assert!(parse_bool("x", None, true).unwrap());
        assert!(!parse_bool("x", Some(""), false).unwrap());
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("include_forks", Some("yes"), false).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(msg) if msg.contains("include_forks")));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("limit", Some("5")).unwrap(), Some(5));
        assert_eq!(parse_int("limit", Some("-2")).unwrap(), Some(-2));
        assert_eq!(parse_int("limit", None).unwrap(), None);
        assert!(parse_int("limit", Some("five")).is_err());
        assert!(parse_int("limit", Some("1.5")).is_err());
    }

    #[test]
    fn test_parse_languages() {
        assert_eq!(
            parse_languages(Some("Python, Go,,")),
            Some(vec!["Python".to_string(), "Go".to_string()])
        );
        assert_eq!(parse_languages(Some(" , ")), None);
        assert_eq!(parse_languages(None), None);
    }

    #[test]
    fn test_repository_params_defaults() {
        let options = RepositoryParams::default().query_options().unwrap();
        assert!(!options.include_forks);
        assert_eq!(options.sort, SortKey::Updated);
        assert_eq!(options.limit, None);
        assert!(options.languages.is_none());
    }

    #[test]
    fn test_repository_params_bad_sort() {
        let params = RepositoryParams {
            sort: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.query_options(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_featured_limit_default() {
        assert_eq!(FeaturedParams::default().limit().unwrap(), 6);

        let params = FeaturedParams {
            limit: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(params.limit().unwrap(), 3);
    }
}

use serde::Deserialize;
use validator::Validate;

use crate::repository::ListQuery;

pub const DEFAULT_LIMIT: i64 = 5;
pub const MAX_LIMIT: i64 = 100;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// `?limite=&desde=` query of the listing endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limite must be between 1 and 100"))]
    pub limite: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "desde must be zero or greater"))]
    pub desde: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limite: DEFAULT_LIMIT,
            desde: 0,
        }
    }
}

impl ListParams {
    /// Listing window; values are clamped so an unchecked form is still safe.
    pub fn to_query(&self) -> ListQuery {
        ListQuery::default().paginate(
            self.limite.clamp(1, MAX_LIMIT) as usize,
            self.desde.max(0) as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Pagination;

    #[test]
    fn defaults_apply_when_missing() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limite, 5);
        assert_eq!(params.desde, 0);
        assert!(params.validate().is_ok());
        assert_eq!(
            params.to_query().pagination,
            Some(Pagination {
                limit: 5,
                offset: 0
            })
        );
    }

    #[test]
    fn range_is_enforced() {
        for (limite, desde) in [(0, 0), (101, 0), (5, -1)] {
            assert!(ListParams { limite, desde }.validate().is_err());
        }
        assert!(ListParams { limite: 100, desde: 40 }.validate().is_ok());
    }
}

/// Page window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

pub const DEFAULT_LIMIT: i64 = 10;

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl LimitOffset {
    /// Builds a window with `limit` clamped to `1..=max_limit` and a
    /// non-negative `offset`.
    pub fn bounded(limit: Option<i64>, offset: Option<i64>, max_limit: i64) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max_limit.max(1)),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    pub fn skip(&self) -> u64 {
        u64::try_from(self.offset).unwrap_or(0)
    }

    pub fn take(&self) -> u64 {
        u64::try_from(self.limit).unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(LimitOffset::bounded(None, None, 100), LimitOffset::default());
    }

    #[test]
    fn limit_and_offset_are_clamped() {
        let page = LimitOffset::bounded(Some(5_000), Some(-3), 100);
        assert_eq!(page, LimitOffset { limit: 100, offset: 0 });

        let page = LimitOffset::bounded(Some(0), Some(7), 100);
        assert_eq!(page, LimitOffset { limit: 1, offset: 7 });
    }
}

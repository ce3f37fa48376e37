use std::fmt;

/// A named backend collection. Cache keys and invalidation are scoped by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Transactions,
    Categories,
    Items,
    Comments,
    CategorySpending,
    MonthlyTrends,
    BehaviorInsights,
    CurrentUser,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Transactions => "transactions",
            Resource::Categories => "categories",
            Resource::Items => "items",
            Resource::Comments => "comments",
            Resource::CategorySpending => "category-spending",
            Resource::MonthlyTrends => "monthly-trends",
            Resource::BehaviorInsights => "behavior-insights",
            Resource::CurrentUser => "current-user",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

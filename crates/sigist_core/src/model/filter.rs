//! Read filter with explicit match precedence.

/// Mutually exclusive match criterion for the read path.
///
/// Built once at the transport boundary via [`Filter::from_fields`], so the
/// precedence `id > email > first name > all` is fixed by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    ById(String),
    ByEmail(String),
    ByFirstName(String),
    #[default]
    All,
}

impl Filter {
    /// Collapses optional transport fields into one criterion.
    ///
    /// The first set field in the order id, email, first name wins; the
    /// remaining fields are ignored.
    pub fn from_fields(
        id: Option<String>,
        email: Option<String>,
        first_name: Option<String>,
    ) -> Self {
        match (id, email, first_name) {
            (Some(id), _, _) => Self::ById(id),
            (None, Some(email), _) => Self::ByEmail(email),
            (None, None, Some(first_name)) => Self::ByFirstName(first_name),
            (None, None, None) => Self::All,
        }
    }

    /// Returns the bound argument, if the criterion has one.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::ById(value) | Self::ByEmail(value) | Self::ByFirstName(value) => {
                Some(value.as_str())
            }
            Self::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Filter;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn id_wins_over_every_other_field() {
        let filter = Filter::from_fields(some("42"), some("a@b.c"), some("Ann"));
        assert_eq!(filter, Filter::ById("42".to_string()));
    }

    #[test]
    fn email_wins_over_first_name() {
        let filter = Filter::from_fields(None, some("a@b.c"), some("Ann"));
        assert_eq!(filter, Filter::ByEmail("a@b.c".to_string()));
    }

    #[test]
    fn first_name_alone() {
        let filter = Filter::from_fields(None, None, some("Ann"));
        assert_eq!(filter, Filter::ByFirstName("Ann".to_string()));
    }

    #[test]
    fn no_fields_means_all() {
        let filter = Filter::from_fields(None, None, None);
        assert_eq!(filter, Filter::All);
        assert_eq!(filter.argument(), None);
    }
}

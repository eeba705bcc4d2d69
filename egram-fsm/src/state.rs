//! State tags: value-type identifiers for conversation states.

use std::fmt;

/// A conversation state, identified by its declaring group and field name.
///
/// Equality and display are by qualified name, so two independently
/// constructed tags for the same declared field compare equal and stringify
/// identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateTag {
    group: &'static str,
    name: &'static str,
}

impl StateTag {
    pub const fn new(group: &'static str, name: &'static str) -> Self {
        Self { group, name }
    }

    pub fn group(&self) -> &'static str {
        self.group
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Declares a group of state tags as associated constants:
///
/// ```ignore
/// states_group! {
///     pub struct OrderFlow { WAITING_ADDRESS, WAITING_PAYMENT }
/// }
/// // OrderFlow::WAITING_ADDRESS displays as "OrderFlow:WAITING_ADDRESS"
/// ```
#[macro_export]
macro_rules! states_group {
    ($(#[$meta:meta])* $vis:vis struct $group:ident { $($(#[$smeta:meta])* $state:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $group;

        impl $group {
            $(
                $(#[$smeta])*
                $vis const $state: $crate::StateTag =
                    $crate::StateTag::new(stringify!($group), stringify!($state));
            )+
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    states_group! {
        struct Checkout { WAITING_ADDRESS, WAITING_PAYMENT }
    }

    #[test]
    fn test_independent_constructions_compare_equal() {
        let a = StateTag::new("Checkout", "WAITING_ADDRESS");
        assert_eq!(a, Checkout::WAITING_ADDRESS);
        assert_eq!(a.to_string(), Checkout::WAITING_ADDRESS.to_string());
    }

    #[test]
    fn test_display_is_group_qualified() {
        assert_eq!(
            Checkout::WAITING_PAYMENT.to_string(),
            "Checkout:WAITING_PAYMENT"
        );
    }

    #[test]
    fn test_same_name_in_different_groups_differs() {
        let other = StateTag::new("Refund", "WAITING_ADDRESS");
        assert_ne!(other, Checkout::WAITING_ADDRESS);
    }
}

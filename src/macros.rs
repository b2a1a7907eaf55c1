//! Macros for declaring state and trigger identities.

/// Generate a [`State`](crate::core::State) implementation for a simple enum.
///
/// # Example
///
/// ```
/// use strata::state_enum;
/// use strata::core::State;
///
/// state_enum! {
///     pub enum Connection {
///         Disconnected,
///         Connecting,
///         Connected,
///     }
/// }
///
/// assert_eq!(Connection::Connecting.name(), "Connecting");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a [`Trigger`](crate::core::Trigger) implementation for a simple
/// enum. Same shape as [`state_enum!`], with `Eq + Hash` added.
///
/// # Example
///
/// ```
/// use strata::trigger_enum;
/// use strata::core::Trigger;
///
/// trigger_enum! {
///     pub enum Call {
///         Dial,
///         HangUp,
///     }
/// }
///
/// assert_eq!(Call::HangUp.name(), "HangUp");
/// ```
#[macro_export]
macro_rules! trigger_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Trigger for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

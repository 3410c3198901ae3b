//! `define_port_error!` generates the error enum of a port.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! parameters accept anything convertible into the field type, so adapters
//! can write `UserPersistenceError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        /// Failures of an imaginary guestbook store.
        pub enum GuestbookError {
            Offline => "guestbook offline",
            Query { message: String } => "guestbook query failed: {message}",
            Missing { entry: i32 } => "guestbook entry {entry} not found",
            Rejected { author: String, entry: i32 } => "{author} may not edit entry {entry}",
        }
    }

    #[rstest]
    #[case(GuestbookError::offline(), "guestbook offline")]
    #[case(GuestbookError::query("timeout"), "guestbook query failed: timeout")]
    #[case(GuestbookError::missing(7), "guestbook entry 7 not found")]
    #[case(GuestbookError::rejected("ada", 3), "ada may not edit entry 3")]
    fn constructors_render_messages(#[case] error: GuestbookError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn string_fields_accept_owned_and_borrowed_text() {
        assert_eq!(
            GuestbookError::query(String::from("boom")),
            GuestbookError::Query {
                message: "boom".to_owned()
            }
        );
    }
}

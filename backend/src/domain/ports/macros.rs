//! `define_port_error!` builds a `thiserror` enum for a port together with
//! snake_case constructors that accept `impl Into<T>` for every field.

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
    define_port_error! {
        pub enum StorePortError {
            Unreachable { message: String } => "store unreachable: {message}",
            Capacity { limit: u32 } => "store full at {limit} records",
            Rejected { reason: String, attempts: u32 } => "rejected after {attempts}: {reason}",
            Closed => "store closed",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = StorePortError::unreachable("refused");
        assert_eq!(err.to_string(), "store unreachable: refused");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = StorePortError::capacity(3_u32);
        assert_eq!(err.to_string(), "store full at 3 records");
    }

    #[test]
    fn mixed_fields_and_unit_variants() {
        assert_eq!(
            StorePortError::rejected("duplicate", 2_u32).to_string(),
            "rejected after 2: duplicate"
        );
        assert_eq!(StorePortError::closed(), StorePortError::Closed);
    }
}

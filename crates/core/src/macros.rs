// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for reducing boilerplate.
//!
//! - [`simple_display!`] — `Display` impl mapping enum variants to string literals
//! - [`fields!`] — build an event field bag from key/value pairs

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// Unit variants match directly; data-carrying variants use `(..)` to ignore fields.
///
/// ```ignore
/// crate::simple_display! {
///     MyEnum {
///         Foo => "foo",
///         Bar(..) => "bar",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? => $str, )+
                })
            }
        }
    };
}

/// Build an event [`Fields`](crate::event::Fields) map.
///
/// Values are anything `serde_json::Value: From<T>` accepts (strings, numbers,
/// booleans, `Value` itself).
///
/// ```ignore
/// let fields = room_core::fields! {
///     "node_id" => "puzzle_scarab",
///     "attempts" => 3,
/// };
/// ```
#[macro_export]
macro_rules! fields {
    ( $( $key:literal => $value:expr ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut map = $crate::event::Fields::new();
        $( map.insert($key.to_string(), ::serde_json::Value::from($value)); )*
        map
    }};
}

#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the kvfs workspace. At the moment this is the
//! [`kvfs_error`] attribute, which every crate uses to declare its error enum.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring a crate's error enum.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every source-carrying variant.
/// * **Standard Conversions**: Implements `From<Source>` for variants with a source field,
///   so upstream errors can be propagated with `?`.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants carrying a source (a field named `source`, or marked `#[source]`/`#[from]`)
///    must also carry `context: Option<Cow<'static, str>>`.
/// 3. The macro emits a private `format_context` helper in the surrounding module, so
///    declare one error enum per module.
///
/// # Example
///
/// ```rust,ignore
/// use kvfs_derive::kvfs_error;
/// use std::borrow::Cow;
///
/// #[kvfs_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &str) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context(format!("Reading {path}"))
/// }
/// ```
#[proc_macro_attribute]
pub fn kvfs_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

//! HTTP bindings for protobuf RPC methods.
//!
//! A method carries its binding as a custom option, e.g.
//!
//! ```proto
//! rpc GetUser(GetUserRequest) returns (User) {
//!   option (acme.annotations.http) = "GET:/v1/users/{user.id}";
//! }
//! ```
//!
//! The option is an *extension* of `google.protobuf.MethodOptions`, so a
//! reader that was not built with the extension compiled in only sees unknown
//! field bytes. This crate recovers it in two explicit phases:
//!
//! - [`catalog::ExtensionCatalog`] walks every loaded file (all nesting depths)
//!   and registers each extension declaration into its own descriptor pool;
//! - [`options::extract`] re-decodes a method's raw option bytes against that
//!   pool and picks the extension by name.
//!
//! The decoded string is then parsed ([`grammar`]), its placeholders resolved
//! into GDScript accessors ([`resolve`]) and everything is folded into one
//! [`assemble::CallDescriptor`] per annotated method.

pub mod assemble;
pub mod catalog;
pub mod error;
pub mod grammar;
pub mod options;
pub mod resolve;
pub mod schema;

pub use assemble::{assemble, CallDescriptor, DEFAULT_BINDING_OPTION};
pub use catalog::ExtensionCatalog;
pub use error::{BindingError, ErrorKind, GrammarError, SchemaIntegrityError};
pub use grammar::{parse_binding, BindingSpec, FieldPath, Segment};
pub use options::RawOptions;
pub use resolve::{BodyField, FieldAccess};
pub use schema::SchemaSet;

//! Parser and emitter for a strict, human-editable subset of YAML.
//!
//! The format admits exactly four structural concepts: scalar string
//! values, ordered sequences, keyed maps, and line comments. Flow syntax,
//! anchors, aliases, tags, merge keys, and implicit typing are excluded.
//! Every scalar is a string; typed access goes through the conversion
//! traits in [`convert`].
//!
//! Documents are stored as a dense vector of small tagged elements whose
//! strings live in one append-only byte arena, and a single document-wide
//! hash index gives O(1) map key access. Two emitters walk the tree without
//! mutating it: [`Document::as_yaml`] reproduces an editable document and
//! [`Document::as_py_struct`] produces a deterministic structural form.
//!
//! # Examples
//!
//! Parse and read:
//!
//! ```rust
//! let doc = yamlite::parse("name: Ada\nskills:\n  - math\n  - engines\n")?;
//! let root = doc.root();
//! assert_eq!(root.get("name")?.as_str()?, "Ada");
//! assert_eq!(root.get("skills")?.at(1)?.as_str()?, "engines");
//! # Ok::<(), yamlite::Error>(())
//! ```
//!
//! Typed access through the conversion layer:
//!
//! ```rust
//! let doc = yamlite::parse("port: 8080\nretry: true\n")?;
//! assert_eq!(doc.root().get("port")?.decode::<u16>()?, 8080);
//! assert!(doc.root().get("retry")?.decode::<bool>()?);
//! # Ok::<(), yamlite::Error>(())
//! ```
//!
//! Build a document programmatically and emit it:
//!
//! ```rust
//! let mut doc = yamlite::Document::new();
//! doc.root_mut().set_map()?;
//! doc.root_mut().insert("name", "Ada")?;
//! doc.root_mut().insert_sequence("skills")?;
//! doc.root_mut().get_mut("skills")?.push_back("math")?;
//! assert_eq!(doc.as_yaml(), "name: Ada\nskills:\n  - math");
//! # Ok::<(), yamlite::Error>(())
//! ```
//!
//! Assigning through an absent map key materializes the entry:
//!
//! ```rust
//! let mut doc = yamlite::parse("a: 1\n")?;
//! doc.root_mut().get_mut("b")?.set("2")?;
//! assert_eq!(doc.as_yaml(), "a: 1\nb: 2");
//! # Ok::<(), yamlite::Error>(())
//! ```

mod arena;
mod context;
pub mod convert;
mod decode;
mod document;
mod element;
mod encode;
mod error;
mod index;
mod node;

pub use convert::{FromScalar, ToScalar};
pub use decode::parse;
pub use document::Document;
pub use element::NodeKind;
pub use error::{Error, ErrorKind, Result};
pub use node::{Children, Node, NodeMut};

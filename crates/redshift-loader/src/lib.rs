//! # redshift-loader
//!
//! Move tabular data from an in-memory frame into Amazon Redshift through
//! an S3 staging bucket:
//!
//! - **Schema reconciliation** of an incoming frame against an existing
//!   table when appending
//! - **Type mapping** from native column tags to Redshift column types
//! - **Statement building** for table-creation DDL and the bulk COPY
//! - **Staging** via any [`object_store::ObjectStore`] implementation
//!
//! The warehouse connection is an external collaborator behind the
//! [`Warehouse`] trait; the object store likewise. Both are bound once into
//! a [`Session`] and reused across loads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use redshift_loader::{
//!     Column, DType, Frame, LoadOptions, Session, SessionConfig, StageWindow, Value,
//! };
//!
//! # async fn run(warehouse: Arc<dyn redshift_loader::Warehouse>,
//! #              store: Arc<dyn object_store::ObjectStore>) -> redshift_loader::Result<()> {
//! let config = SessionConfig::load("session.yaml")?;
//! let mut session = Session::new(config, warehouse, store);
//!
//! let frame = Frame::from_columns(vec![
//!     Column::new("id", DType::Int64, vec![Value::Int(1)]),
//!     Column::new("name", DType::Text, vec![Value::Text("a".into())]),
//! ])?;
//!
//! let window = StageWindow::new("2024-01-01", "current_date - interval '1 day'");
//! session.load(frame, "events", &window, &LoadOptions::default()).await?;
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod stage;
pub mod statement;
pub mod typemap;
pub mod validate;
pub mod warehouse;

// Re-exports for convenient access
pub use config::{AwsCredentials, Secret, SessionConfig, SECRET_MASK};
pub use self::core::{Column, DType, Frame, Value};
pub use error::{LoadError, Result};
pub use pipeline::{resolve_boundary, LoadOptions, Session, StageWindow};
pub use stage::{to_delimited, StageOptions, StorageOptions, Uploader};
pub use statement::{Authorization, ColumnDef, CopyStatement, CreateTable};
pub use typemap::{column_types, redshift_type, SEMI_STRUCTURED_TYPE};
pub use validate::{is_reserved, validate_column_names};
pub use warehouse::Warehouse;

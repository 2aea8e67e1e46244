//! Load pipeline orchestration.
//!
//! A [`Session`] binds the warehouse connection and the staging store once
//! and sequences each load:
//! validate → (append: fetch schema → reconcile) → stage → (replace:
//! create table) → copy → commit. Stages run strictly one after another;
//! concurrent loads over one session must be serialized by the caller
//! (enforced here by `&mut self`).

mod window;

pub use window::{resolve_boundary, StageWindow};

use std::collections::HashSet;
use std::sync::Arc;

use object_store::ObjectStore;
use tracing::{error, info, warn};

use crate::config::{AwsCredentials, SessionConfig};
use crate::core::Frame;
use crate::error::Result;
use crate::reconcile::reconcile;
use crate::stage::{StageOptions, StorageOptions, Uploader};
use crate::statement::{Authorization, ColumnDef, CopyStatement, CreateTable};
use crate::typemap::column_types;
use crate::validate::validate_column_names;
use crate::warehouse::Warehouse;

/// Options controlling one load: physical table layout, append vs. replace,
/// and staging format.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Append to an existing table instead of replacing it.
    ///
    /// When false the target table is unconditionally dropped and
    /// recreated. This is destructive and not append-safe; any existing
    /// table of the same name is lost.
    pub append: bool,

    /// Materialize the index (row number) as the first column.
    pub index: bool,

    /// Also write the staged file to the current directory.
    pub save_local: bool,

    /// Staging field delimiter.
    pub delimiter: char,

    /// Staging CSV quote character.
    pub quote_char: char,

    /// COPY `dateformat` value.
    pub dateformat: String,

    /// COPY `timeformat` value.
    pub timeformat: String,

    /// Distribution style (`even` or `all`). Ignored when `distkey` is set.
    pub diststyle: String,

    /// Distribution key column; takes precedence over `diststyle`.
    pub distkey: Option<String>,

    /// Sort key column(s).
    pub sortkey: Option<String>,

    /// Whether the sort key is interleaved.
    pub sort_interleaved: bool,

    /// Explicit column type overrides, in column order (index first when
    /// materialized). Computed from the frame when absent.
    pub column_types: Option<Vec<String>>,

    /// Columns stored as the semi-structured `SUPER` type regardless of
    /// their native tag.
    pub json_columns: HashSet<String>,

    /// Warehouse-side IAM role for the COPY. Highest authorization
    /// precedence.
    pub warehouse_iam_role: Option<String>,

    /// Extra COPY parameters appended verbatim.
    pub copy_parameters: String,

    /// Storage options passed through to the object store.
    pub storage: StorageOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            append: false,
            index: false,
            save_local: false,
            delimiter: ',',
            quote_char: '"',
            dateformat: "auto".to_string(),
            timeformat: "auto".to_string(),
            diststyle: "even".to_string(),
            distkey: None,
            sortkey: None,
            sort_interleaved: false,
            column_types: None,
            json_columns: HashSet::new(),
            warehouse_iam_role: None,
            copy_parameters: String::new(),
            storage: StorageOptions::default(),
        }
    }
}

/// A bound warehouse connection plus staging store.
///
/// Construct once and reuse across loads. Dropping or [`close`](Session::close)-ing
/// the session discards the shared state; the compiler rejects use after
/// close because `close` consumes the session.
pub struct Session {
    warehouse: Arc<dyn Warehouse>,
    uploader: Uploader,
    credentials: AwsCredentials,
    region: Option<String>,
    mask_secrets: bool,
}

impl Session {
    /// Bind a warehouse connection and object store under a configuration.
    pub fn new(
        config: SessionConfig,
        warehouse: Arc<dyn Warehouse>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let uploader = Uploader::new(store, config.bucket.as_str(), config.subdirectory.as_deref());
        Self {
            warehouse,
            uploader,
            credentials: config.credentials,
            region: config.region,
            mask_secrets: config.mask_secrets,
        }
    }

    /// Run an ad hoc query against the warehouse, returning the result as a
    /// frame.
    pub async fn query(&self, sql: &str) -> Result<Frame> {
        self.warehouse.query(sql).await
    }

    /// Execute a statement and commit it.
    pub async fn exec_commit(&self, sql: &str) -> Result<()> {
        self.warehouse.execute(sql).await?;
        self.warehouse.commit().await
    }

    /// Load a frame into a warehouse table through the staging store.
    ///
    /// In append mode the frame is first reconciled against the existing
    /// table's schema (incoming-only columns are silently dropped). In
    /// replace mode any existing table of the same name is dropped and
    /// recreated before the copy. This is destructive and gated only by
    /// [`LoadOptions::append`].
    ///
    /// Table creation and the copy commit independently; a failure between
    /// them can leave an empty table behind. A copy failure rolls back the
    /// copy transaction, logs the statement with secrets masked, and
    /// re-raises. Neither the staged object nor an already-created table is
    /// cleaned up on failure.
    pub async fn load(
        &mut self,
        mut frame: Frame,
        table: &str,
        window: &StageWindow,
        opts: &LoadOptions,
    ) -> Result<()> {
        validate_column_names(&mut frame)?;

        if opts.append {
            let reference = self
                .warehouse
                .query(&format!("select * from {} limit 1", table))
                .await?;
            frame = reconcile(frame, Some(&reference));
        }

        let key = window.object_key(table);
        let stage_opts = StageOptions {
            include_index: opts.index,
            delimiter: opts.delimiter,
            quote_char: opts.quote_char,
            save_local: opts.save_local,
            storage: opts.storage.clone(),
        };
        let uri = self.uploader.upload(&frame, &key, &stage_opts).await?;

        if !opts.append {
            self.create_table(&frame, table, opts).await?;
        }

        self.copy(table, &uri, opts).await
    }

    /// Drop any existing table of the same name and create a fresh one
    /// shaped after the frame.
    async fn create_table(&self, frame: &Frame, table: &str, opts: &LoadOptions) -> Result<()> {
        let types = match &opts.column_types {
            Some(types) => types.clone(),
            None => column_types(frame, opts.index, &opts.json_columns),
        };

        let mut names: Vec<String> = Vec::new();
        if opts.index {
            names.push(frame.index_name().to_string());
        }
        names.extend(frame.columns().iter().map(|c| c.name.clone()));

        let columns = names
            .into_iter()
            .zip(types)
            .map(|(name, sql_type)| ColumnDef { name, sql_type })
            .collect();

        let ddl = CreateTable {
            table: table.to_string(),
            columns,
            diststyle: opts.diststyle.clone(),
            distkey: opts.distkey.clone(),
            sortkey: opts.sortkey.clone(),
            interleaved: opts.sort_interleaved,
        }
        .render()?;

        info!(statement = %ddl, "creating table in redshift");
        self.exec_commit(&ddl).await
    }

    /// Issue the bulk copy from the staged object, committing on success and
    /// rolling back on failure.
    async fn copy(&self, table: &str, uri: &str, opts: &LoadOptions) -> Result<()> {
        let statement = CopyStatement {
            table: table.to_string(),
            source_uri: uri.to_string(),
            delimiter: opts.delimiter,
            quote_char: opts.quote_char,
            dateformat: opts.dateformat.clone(),
            timeformat: opts.timeformat.clone(),
            authorization: Authorization::resolve(
                opts.warehouse_iam_role.as_deref(),
                &self.credentials,
            ),
            parameters: opts.copy_parameters.clone(),
            region: self.region.clone(),
            session_token: self.credentials.session_token.clone(),
        };

        let sql = statement.render();
        let logged = if self.mask_secrets {
            statement.render_masked()
        } else {
            sql.clone()
        };

        info!(statement = %logged, "filling table in redshift");
        if let Err(e) = self.warehouse.execute(&sql).await {
            error!(statement = %logged, error = %e, "copy failed, rolling back");
            if let Err(rb) = self.warehouse.rollback().await {
                warn!(error = %rb, "rollback after failed copy also failed");
            }
            return Err(e);
        }
        self.warehouse.commit().await
    }

    /// Tear the session down: close the warehouse connection (cursor close,
    /// commit, connection close) and discard the shared state.
    ///
    /// Close errors are logged, not raised; consuming `self` makes any later
    /// use a compile error rather than a stale-credential surprise.
    pub async fn close(self) {
        if let Err(e) = self.warehouse.close().await {
            warn!(error = %e, "error closing warehouse connection");
        }
    }
}

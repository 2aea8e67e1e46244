//! Structured builders for the warehouse statements.
//!
//! Statements are assembled as plain structs with explicit fields and only
//! rendered to SQL text at the warehouse boundary. Identifiers are
//! interpolated verbatim: table and column names are the caller's
//! responsibility, which is an accepted limitation of the bulk-load
//! interface, not a defense this module attempts to add.

use crate::config::{AwsCredentials, Secret, SECRET_MASK};
use crate::error::{LoadError, Result};

/// A column name / Redshift type pair for table creation.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name, already normalized/quoted by the validator.
    pub name: String,
    /// Redshift type keyword.
    pub sql_type: String,
}

impl ColumnDef {
    /// Create a column definition.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

/// Table-creation DDL: an unconditional drop followed by a create.
///
/// Rendering this statement and executing it replaces any existing table of
/// the same name. This is destructive by design and is gated by the
/// pipeline's append flag.
#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Target table name.
    pub table: String,

    /// Columns in order (index column first when materialized).
    pub columns: Vec<ColumnDef>,

    /// Distribution style, `even` or `all`. Ignored when `distkey` is set.
    pub diststyle: String,

    /// Distribution key column. Takes precedence over `diststyle`.
    pub distkey: Option<String>,

    /// Sort key column(s), single or composite.
    pub sortkey: Option<String>,

    /// Whether the sort key is interleaved.
    pub interleaved: bool,
}

impl CreateTable {
    /// Render the DDL text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidOption`] when no distribution key is
    /// given and `diststyle` is neither `even` nor `all`.
    pub fn render(&self) -> Result<String> {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type))
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = format!(
            "drop table if exists {0}; create table {0} ({1})",
            self.table, columns
        );

        match self.distkey.as_deref() {
            Some(key) if !key.is_empty() => {
                // A distkey silently overrides the diststyle.
                stmt.push_str(&format!(" distkey({})", key));
            }
            _ => {
                if self.diststyle != "even" && self.diststyle != "all" {
                    return Err(LoadError::InvalidOption(format!(
                        "diststyle must be either 'even' or 'all', got '{}'",
                        self.diststyle
                    )));
                }
                stmt.push_str(&format!(" diststyle {}", self.diststyle));
            }
        }

        if let Some(sortkey) = self.sortkey.as_deref() {
            if !sortkey.is_empty() {
                if self.interleaved {
                    stmt.push_str(" interleaved");
                }
                stmt.push_str(&format!(" sortkey({})", sortkey));
            }
        }

        Ok(stmt)
    }
}

/// Authorization clause of the COPY statement.
///
/// Resolved in precedence order: warehouse-side IAM role, access-key pair,
/// caller-side IAM role, none. An absent clause is accepted; the COPY will
/// fail at the warehouse unless the bucket is public, which is treated as a
/// caller error.
#[derive(Debug, Clone)]
pub enum Authorization {
    /// `iam_role '<arn>'` (warehouse-side or caller-side role).
    IamRole(String),
    /// `access_key_id '<id>' secret_access_key '<key>'`.
    AccessKeys {
        access_key_id: Secret,
        secret_access_key: Secret,
    },
    /// No authorization clause.
    None,
}

impl Authorization {
    /// Resolve the clause from the per-call warehouse role and the session
    /// credentials.
    pub fn resolve(warehouse_iam_role: Option<&str>, credentials: &AwsCredentials) -> Self {
        if let Some(role) = warehouse_iam_role.filter(|r| !r.is_empty()) {
            return Authorization::IamRole(role.to_string());
        }
        if let (Some(id), Some(key)) = (
            credentials.access_key_id.as_ref(),
            credentials.secret_access_key.as_ref(),
        ) {
            return Authorization::AccessKeys {
                access_key_id: id.clone(),
                secret_access_key: key.clone(),
            };
        }
        if let Some(role) = credentials.iam_role.as_deref().filter(|r| !r.is_empty()) {
            return Authorization::IamRole(role.to_string());
        }
        Authorization::None
    }

    fn clause(&self, masked: bool) -> String {
        match self {
            Authorization::IamRole(role) => format!("iam_role '{}'", role),
            Authorization::AccessKeys {
                access_key_id,
                secret_access_key,
            } => {
                if masked {
                    format!(
                        "access_key_id '{}' secret_access_key '{}'",
                        SECRET_MASK, SECRET_MASK
                    )
                } else {
                    format!(
                        "access_key_id '{}' secret_access_key '{}'",
                        access_key_id.expose(),
                        secret_access_key.expose()
                    )
                }
            }
            Authorization::None => String::new(),
        }
    }
}

/// Bulk-copy DML loading a staged object into a table.
#[derive(Debug, Clone)]
pub struct CopyStatement {
    /// Target table name.
    pub table: String,

    /// `s3://bucket/key` URI of the staged object.
    pub source_uri: String,

    /// Field delimiter of the staged file.
    pub delimiter: char,

    /// CSV quote character of the staged file.
    pub quote_char: char,

    /// COPY `dateformat` value.
    pub dateformat: String,

    /// COPY `timeformat` value.
    pub timeformat: String,

    /// Resolved authorization clause.
    pub authorization: Authorization,

    /// Extra COPY parameters appended verbatim.
    pub parameters: String,

    /// Optional `region` clause.
    pub region: Option<String>,

    /// Optional `session_token` clause for temporary credentials.
    pub session_token: Option<Secret>,
}

impl CopyStatement {
    /// Render the statement sent to the warehouse. Secrets are exposed; this
    /// text must never be logged directly.
    pub fn render(&self) -> String {
        self.render_inner(false)
    }

    /// Render with every secret replaced by the fixed mask, for log output.
    pub fn render_masked(&self) -> String {
        self.render_inner(true)
    }

    fn render_inner(&self, masked: bool) -> String {
        let mut parts = vec![
            format!("copy {}", self.table),
            format!("from '{}'", self.source_uri),
            format!("delimiter '{}'", self.delimiter),
            "ignoreheader 1".to_string(),
            format!("csv quote as '{}'", self.quote_char),
            format!("dateformat '{}'", self.dateformat),
            format!("timeformat '{}'", self.timeformat),
        ];

        let auth = self.authorization.clause(masked);
        if !auth.is_empty() {
            parts.push(auth);
        }
        if !self.parameters.is_empty() {
            parts.push(self.parameters.clone());
        }
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty()) {
            parts.push(format!("region '{}'", region));
        }
        if let Some(token) = &self.session_token {
            let value = if masked { SECRET_MASK } else { token.expose() };
            parts.push(format!("session_token '{}'", value));
        }

        format!("{};", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_table() -> CreateTable {
        CreateTable {
            table: "t".to_string(),
            columns: vec![
                ColumnDef::new("a", "INTEGER"),
                ColumnDef::new("b", "VARCHAR(MAX)"),
            ],
            diststyle: "even".to_string(),
            distkey: None,
            sortkey: None,
            interleaved: false,
        }
    }

    #[test]
    fn test_create_table_render() {
        let ddl = create_table().render().unwrap();
        assert_eq!(
            ddl,
            "drop table if exists t; create table t (a INTEGER, b VARCHAR(MAX)) diststyle even"
        );
    }

    #[test]
    fn test_distkey_overrides_diststyle() {
        let mut stmt = create_table();
        stmt.distkey = Some("a".to_string());
        stmt.diststyle = "bogus".to_string();
        let ddl = stmt.render().unwrap();
        assert!(ddl.contains("distkey(a)"));
        assert!(!ddl.contains("diststyle"));
    }

    #[test]
    fn test_invalid_diststyle_rejected() {
        let mut stmt = create_table();
        stmt.diststyle = "key".to_string();
        let err = stmt.render().unwrap_err();
        assert!(matches!(err, LoadError::InvalidOption(_)));
    }

    #[test]
    fn test_sortkey_clause() {
        let mut stmt = create_table();
        stmt.sortkey = Some("a, b".to_string());
        assert!(stmt.render().unwrap().ends_with(" sortkey(a, b)"));

        stmt.interleaved = true;
        assert!(stmt.render().unwrap().ends_with(" interleaved sortkey(a, b)"));
    }

    #[test]
    fn test_quoted_column_name_survives_render() {
        let mut stmt = create_table();
        stmt.columns = vec![ColumnDef::new("\"unit price\"", "REAL")];
        let ddl = stmt.render().unwrap();
        assert!(ddl.contains("\"unit price\" REAL"));
    }

    fn copy_statement(authorization: Authorization) -> CopyStatement {
        CopyStatement {
            table: "t".to_string(),
            source_uri: "s3://bucket/t-2024-01-01_2024-01-02.csv".to_string(),
            delimiter: ',',
            quote_char: '"',
            dateformat: "auto".to_string(),
            timeformat: "auto".to_string(),
            authorization,
            parameters: String::new(),
            region: None,
            session_token: None,
        }
    }

    #[test]
    fn test_copy_render_basic() {
        let sql = copy_statement(Authorization::None).render();
        assert_eq!(
            sql,
            "copy t from 's3://bucket/t-2024-01-01_2024-01-02.csv' delimiter ',' \
             ignoreheader 1 csv quote as '\"' dateformat 'auto' timeformat 'auto';"
        );
    }

    #[test]
    fn test_copy_render_region_and_token() {
        let mut stmt = copy_statement(Authorization::IamRole("arn:role".to_string()));
        stmt.region = Some("eu-west-1".to_string());
        stmt.session_token = Some(Secret::new("tok123"));
        let sql = stmt.render();
        assert!(sql.contains("iam_role 'arn:role'"));
        assert!(sql.contains("region 'eu-west-1'"));
        assert!(sql.ends_with("session_token 'tok123';"));
    }

    #[test]
    fn test_copy_render_masked_hides_secrets() {
        let mut stmt = copy_statement(Authorization::AccessKeys {
            access_key_id: Secret::new("AKIA123"),
            secret_access_key: Secret::new("sekrit"),
        });
        stmt.session_token = Some(Secret::new("tok123"));

        let sent = stmt.render();
        assert!(sent.contains("access_key_id 'AKIA123'"));
        assert!(sent.contains("secret_access_key 'sekrit'"));
        assert!(sent.contains("session_token 'tok123'"));

        let logged = stmt.render_masked();
        assert!(!logged.contains("AKIA123"));
        assert!(!logged.contains("sekrit"));
        assert!(!logged.contains("tok123"));
        assert!(logged.contains(&format!("access_key_id '{}'", SECRET_MASK)));
    }

    #[test]
    fn test_authorization_precedence() {
        let mut creds = AwsCredentials {
            access_key_id: Some(Secret::new("id")),
            secret_access_key: Some(Secret::new("key")),
            session_token: None,
            iam_role: Some("arn:caller".to_string()),
        };

        // Warehouse-side role wins over everything.
        let auth = Authorization::resolve(Some("arn:warehouse"), &creds);
        assert!(matches!(auth, Authorization::IamRole(r) if r == "arn:warehouse"));

        // Then the access-key pair.
        let auth = Authorization::resolve(None, &creds);
        assert!(matches!(auth, Authorization::AccessKeys { .. }));

        // Then the caller-side role.
        creds.access_key_id = None;
        let auth = Authorization::resolve(None, &creds);
        assert!(matches!(auth, Authorization::IamRole(r) if r == "arn:caller"));

        // Then nothing.
        creds.iam_role = None;
        let auth = Authorization::resolve(None, &creds);
        assert!(matches!(auth, Authorization::None));
    }
}

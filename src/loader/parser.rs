//! Definition parser
//!
//! Parses and validates paginator definitions. JSON documents are accepted
//! too, since every JSON document is valid YAML.

use crate::error::{Error, Result};
use crate::loader::types::{PaginationDefinition, PaginatorDefinition};
use std::fs;
use std::path::Path;
use url::Url;

/// Load a paginator definition from a file
pub fn load_definition(path: impl AsRef<Path>) -> Result<PaginatorDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read definition file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_definition_from_str(&content)
}

/// Load a paginator definition from a YAML or JSON string
pub fn load_definition_from_str(yaml: &str) -> Result<PaginatorDefinition> {
    let def: PaginatorDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse paginator definition: {e}")))?;

    validate_definition(&def)?;
    Ok(def)
}

/// Validate a paginator definition
fn validate_definition(def: &PaginatorDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::invalid_value("name", "cannot be empty"));
    }

    let url = Url::parse(&def.url)
        .map_err(|e| Error::invalid_value("url", format!("'{}' is not a valid URL: {e}", def.url)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            "url",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if def.http.timeout_secs == 0 {
        return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
    }

    if let Some(ref path) = def.records_path {
        require_non_empty("records_path", path)?;
    }

    validate_pagination(&def.pagination)
}

/// Validate pagination settings
fn validate_pagination(pagination: &PaginationDefinition) -> Result<()> {
    match pagination {
        PaginationDefinition::Cursor {
            cursor_param,
            cursor_path,
            ..
        } => {
            require_non_empty("pagination.cursor_param", cursor_param)?;
            require_non_empty("pagination.cursor_path", cursor_path)
        }
        PaginationDefinition::Offset {
            offset_param,
            limit_param,
            limit,
            total_path,
            ..
        } => {
            require_non_empty("pagination.offset_param", offset_param)?;
            require_non_empty("pagination.limit_param", limit_param)?;
            require_non_empty("pagination.total_path", total_path)?;
            if *limit == 0 {
                return Err(Error::invalid_value("pagination.limit", "must be positive"));
            }
            Ok(())
        }
        PaginationDefinition::PageNumber {
            page_param,
            page_size_param,
            page_size,
            has_more_path,
            ..
        } => {
            require_non_empty("pagination.page_param", page_param)?;
            require_non_empty("pagination.has_more_path", has_more_path)?;
            match (page_size_param, page_size) {
                (Some(param), Some(size)) => {
                    require_non_empty("pagination.page_size_param", param)?;
                    if *size == 0 {
                        return Err(Error::invalid_value(
                            "pagination.page_size",
                            "must be positive",
                        ));
                    }
                    Ok(())
                }
                (None, None) => Ok(()),
                _ => Err(Error::invalid_value(
                    "pagination.page_size",
                    "page_size_param and page_size must be given together",
                )),
            }
        }
        PaginationDefinition::LinkHeader { rel } => require_non_empty("pagination.rel", rel),
        PaginationDefinition::NextUrl { next_url_path } => {
            require_non_empty("pagination.next_url_path", next_url_path)
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_value(field, "cannot be empty"));
    }
    Ok(())
}

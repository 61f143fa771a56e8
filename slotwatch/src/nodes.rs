//! Endpoint list loading (`nodes.txt`)
//!
//! One URL per line. Blank lines and `#` comments are dropped, duplicates are
//! dropped with a warning, anything that is not an http(s) URL is fatal.

use std::collections::HashSet;
use std::path::Path;

use slotwatch_common::types::Endpoint;
use tracing::{info, warn};

use crate::error::EndpointListError;

/// Read and validate the endpoint list at `path`
pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>, EndpointListError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EndpointListError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let endpoints = parse_endpoint_list(path, &contents)?;
    if endpoints.is_empty() {
        warn!(path = %path.display(), "Endpoint list is empty; only the reference will be probed");
    } else {
        info!(path = %path.display(), count = endpoints.len(), "Loaded endpoint list");
    }
    Ok(endpoints)
}

/// Validate endpoint list contents; `path` is only used in messages
pub fn parse_endpoint_list(
    path: &Path,
    contents: &str,
) -> Result<Vec<Endpoint>, EndpointListError> {
    let mut seen = HashSet::new();
    let mut endpoints = Vec::new();

    for (index, raw) in contents.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            warn!(path = %path.display(), line = line_no, "Skipping blank endpoint entry");
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let endpoint = Endpoint::new(line);
        if !endpoint.has_http_scheme() || line.contains(char::is_whitespace) {
            return Err(EndpointListError::InvalidEntry {
                path: path.to_path_buf(),
                line: line_no,
                value: raw.to_string(),
            });
        }

        if !seen.insert(endpoint.clone()) {
            warn!(
                path = %path.display(),
                line = line_no,
                endpoint = %endpoint,
                "Skipping duplicate endpoint"
            );
            continue;
        }
        endpoints.push(endpoint);
    }

    Ok(endpoints)
}

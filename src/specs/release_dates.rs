// src/specs/release_dates.rs
//! Reading spec for Wikipedia "List of … models" pages.
//!
//! Finds the first table whose header names both a model column and a
//! release-date column and returns `(model, "Month Day, Year")` pairs.
//! Header rows are the leading rows made only of `<th>` cells; column
//! positions come from the first header row that names them.

use regex::Regex;
use reqwest::blocking::Client;

use crate::config::consts::WIKIPEDIA_BASE_URL;
use crate::core::html::{tag_blocks_ci, to_lower, row_cells};
use crate::core::net::{self, RetryPolicy};
use crate::error::{Error, Result};

fn header_rows(rows: &[&str]) -> usize {
    rows.iter()
        .take_while(|r| {
            let lc = to_lower(r);
            lc.contains("<th") && !lc.contains("<td")
        })
        .count()
}

fn column(headers: &[Vec<String>], needle: &str) -> Option<usize> {
    headers.iter().find_map(|cells| {
        cells.iter().position(|c| c.to_lowercase().contains(needle))
    })
}

/// Model / release-date pairs from the page's device table, in table order.
pub fn parse(html: &str, page: &str) -> Result<Vec<(String, String)>> {
    let date = Regex::new(r"([A-Za-z]+\s+\d{1,2},\s+\d{4})")?;

    for table in tag_blocks_ci(html, "table") {
        let rows = tag_blocks_ci(table, "tr");
        let n_head = header_rows(&rows).max(1).min(rows.len());
        let headers: Vec<Vec<String>> = rows[..n_head].iter().map(|r| row_cells(r)).collect();

        let (Some(model_col), Some(release_col)) =
            (column(&headers, "model"), column(&headers, "release"))
        else {
            continue;
        };

        let mut out = Vec::new();
        for row in &rows[n_head..] {
            let cells = row_cells(row);
            let Some(model) = cells.get(model_col).filter(|m| !m.is_empty()) else { continue };
            let cell = cells.get(release_col).map(String::as_str).unwrap_or("");
            let value = date
                .find(cell)
                .map(|m| s!(m.as_str()))
                .unwrap_or_else(|| s!(cell.trim()));
            if !value.is_empty() {
                out.push((model.clone(), value));
            }
        }
        logd!("Release dates: {} rows from {page}", out.len());
        return Ok(out);
    }

    Err(Error::NoReleaseTable(s!(page)))
}

pub fn fetch(client: &Client, page: &str, policy: &RetryPolicy) -> Result<Vec<(String, String)>> {
    let url = join!(WIKIPEDIA_BASE_URL, page);
    logf!("Release dates: fetching {url}");
    let html = net::get_text(client, &url, &[], policy)?;
    parse(&html, page)
}

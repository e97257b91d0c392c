//! Reports built on top of [`PlosClient::search`].
//!
//! Each report issues its queries one at a time, in order, and writes
//! human-readable output to the given sink. `graph_pubs` writes a CSV file
//! of per-day publication counts instead.

use crate::client::{PlosClient, Transport};
use crate::dates::{days_between, parse_day, solr_timestamp};
use crate::error::Result;
use crate::normalize::ArticleRecord;
use crate::query::SearchRequest;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Solr returns 10 rows by default; these caps mean "everything"
const VIEWS_ROWS: u64 = 999_999;
const GRAPH_ROWS: u64 = 99_999;
const DAY_LISTING_ROWS: u64 = 9_999;

/// Fields needed to print a linked article listing
const LISTING_FIELDS: &[&str] = &["id", "journal", "title"];

const SEPARATOR: &str = "**********";

fn publication_day_query(day: NaiveDate) -> String {
    format!("publication_date:\"{}/DAY\"", solr_timestamp(day))
}

fn and_clause(mut query: String, extra: Option<&str>) -> String {
    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        query.push_str(" AND ");
        query.push_str(extra);
    }
    query
}

impl<T: Transport> PlosClient<T> {
    /// List articles by `author` as "(n) title (article URL)".
    ///
    /// A strict search quotes the name, so "Michael Eisen" does not also match
    /// every Michael and every Eisen.
    pub async fn author_search(
        &self,
        author: &str,
        strict: bool,
        limit: u64,
        out: &mut impl Write,
    ) -> Result<usize> {
        let name = if strict {
            format!("\"{}\"", author)
        } else {
            author.to_string()
        };
        let request = SearchRequest::new()
            .query(format!("author:{}", name))
            .fields(LISTING_FIELDS)
            .rows(limit);

        let records = self.search(request).await?;
        info!(author = author, strict = strict, count = records.len(), "Author search");

        writeln!(out, "Articles by {}:", author)?;
        writeln!(out, "{}", SEPARATOR)?;
        self.write_listing(&records, out)
    }

    /// Sum all-time views across every article by `author`.
    pub async fn author_views(&self, author: &str, out: &mut impl Write) -> Result<u64> {
        let request = SearchRequest::new()
            .query(format!("author:\"{}\"", author))
            .rows(VIEWS_ROWS)
            .fields(&["counter_total_all"]);

        let records = self.search(request).await?;
        let views: u64 = records.iter().map(ArticleRecord::views).sum();
        info!(author = author, articles = records.len(), views = views, "Author views");

        writeln!(out, "{} has {} all time views on PLoS!", author, views)?;
        Ok(views)
    }

    /// Write `YYYY-MM-DD,<count>` for each day in `[start, end)` to `out_path`.
    ///
    /// `extra_query` (e.g. `journal:"PLoS ONE"`) is ANDed onto every day's
    /// query. The file is overwritten, and flushed and closed even when a
    /// query fails part way; rows written before the failure are kept.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` is returned before the file is touched or any
    /// request is made.
    pub async fn graph_pubs(
        &self,
        start: &str,
        end: &str,
        out_path: &Path,
        extra_query: Option<&str>,
    ) -> Result<usize> {
        let start = parse_day(start)?;
        let end = parse_day(end)?;

        let file = File::create(out_path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        let written = self.write_daily_counts(&mut wtr, start, end, extra_query).await;
        let flushed = wtr.flush();
        drop(wtr);

        let days = written?;
        flushed?;
        info!(days = days, path = ?out_path, "Publication counts written");
        Ok(days)
    }

    async fn write_daily_counts<W: Write>(
        &self,
        wtr: &mut csv::Writer<W>,
        start: NaiveDate,
        end: NaiveDate,
        extra_query: Option<&str>,
    ) -> Result<usize> {
        let mut days = 0;
        for day in days_between(start, end) {
            let request = SearchRequest::new()
                .query(and_clause(publication_day_query(day), extra_query))
                .rows(GRAPH_ROWS)
                .fields(&["id"]);

            let count = self.search(request).await?.len();
            wtr.write_record([day.format("%Y-%m-%d").to_string(), count.to_string()])?;
            days += 1;
        }
        Ok(days)
    }

    /// List the articles published on `day`, optionally in one journal.
    pub async fn pubs_on(
        &self,
        day: &str,
        journal: Option<&str>,
        out: &mut impl Write,
    ) -> Result<usize> {
        let date = parse_day(day)?;
        let journal_clause = journal.map(|j| format!("journal:\"{}\"", j));
        let request = SearchRequest::new()
            .query(and_clause(publication_day_query(date), journal_clause.as_deref()))
            .fields(&["title", "journal", "id"])
            .rows(DAY_LISTING_ROWS);

        let records = self.search(request).await?;
        let scope = journal.map(|j| format!("in {} ", j)).unwrap_or_default();

        if records.is_empty() {
            writeln!(out, "No articles were published {}on {}.", scope, day)?;
            return Ok(0);
        }

        writeln!(out, "Articles published {}on {}:", scope, day)?;
        writeln!(out, "{}", SEPARATOR)?;
        self.write_listing(&records, out)
    }

    /// List articles whose title matches `title` (Solr syntax; quote for a phrase).
    pub async fn title_search(&self, title: &str, limit: u64, out: &mut impl Write) -> Result<usize> {
        let request = SearchRequest::new()
            .query(format!("title:{}", title))
            .fields(LISTING_FIELDS)
            .rows(limit);

        let records = self.search(request).await?;
        info!(title = title, count = records.len(), "Title search");

        writeln!(out, "Articles matching title {}:", title)?;
        writeln!(out, "{}", SEPARATOR)?;
        self.write_listing(&records, out)
    }

    fn write_listing(&self, records: &[ArticleRecord], out: &mut impl Write) -> Result<usize> {
        if records.is_empty() {
            writeln!(out, "No articles found.")?;
            return Ok(0);
        }
        for (i, record) in records.iter().enumerate() {
            let url = record.article_url(&self.config().journals)?;
            writeln!(
                out,
                "({}) {} ({})",
                i + 1,
                record.title.as_deref().unwrap_or("[untitled]"),
                url
            )?;
        }
        Ok(records.len())
    }
}

use anyhow::Result;
use itertools::Itertools;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::{fetch::Fetcher, Term};

pub const UMDIO_URL: &str = "https://api.umd.io/v1";
pub const BATCH_SIZE: usize = 50;
pub const PAGE_SIZE: usize = 100;
pub const MAX_PAGES: usize = 10;
pub const SECTION_ID_SEPARATOR: char = '-';

#[derive(Clone, Debug, Deserialize)]
pub struct Department {
    pub dept_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Course {
    pub course_id: String,
    #[serde(default)]
    pub sections: Vec<String>,
}

/// Section ids look like `CMSC131-0101`; anything else cannot be looked up.
pub fn is_valid_section_id(id: &str) -> bool {
    id.contains(SECTION_ID_SEPARATOR)
}

/// Drops malformed ids and groups the rest, in order, into batches of at
/// most `size`.
pub fn batches(ids: &[String], size: usize) -> Vec<Vec<&str>> {
    let chunks = ids
        .iter()
        .map(String::as_str)
        .filter(|id| is_valid_section_id(id))
        .chunks(size.max(1));

    let batches = (&chunks).into_iter().map(Iterator::collect).collect();
    batches
}

/// Pulls full section records out of the umd.io REST API, department by
/// department.
pub struct UmdIo {
    fetcher: Fetcher,
    base_url: String,
    semester: Term,
    batch_size: usize,
    page_size: usize,
    max_pages: usize,
}

impl UmdIo {
    pub fn new(fetcher: Fetcher, semester: Term) -> Self {
        Self {
            fetcher,
            base_url: UMDIO_URL.to_owned(),
            semester,
            batch_size: BATCH_SIZE,
            page_size: PAGE_SIZE,
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub async fn departments(&self) -> Result<Vec<Department>> {
        let url = format!("{}/courses/departments", self.base_url);
        Ok(self.fetcher.get_json(&url, &[]).await?)
    }

    /// Every course the department offers this semester. Pages are read until
    /// one comes back short or `max_pages` is reached.
    pub async fn courses(&self, dept_id: &str) -> Result<Vec<Course>> {
        let url = format!("{}/courses", self.base_url);
        let semester = self.semester.to_string();
        let per_page = self.page_size.to_string();

        let mut courses = Vec::new();

        for page in 1..=self.max_pages.max(1) {
            let page = page.to_string();
            let query = [
                ("dept_id", dept_id),
                ("semester", semester.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ];

            let found: Vec<Course> = self.fetcher.get_json(&url, &query).await?;
            let last_page = found.len() < self.page_size;
            courses.extend(found);

            if last_page {
                break;
            }
        }

        Ok(courses)
    }

    /// Looks up full section records, one request per batch.
    pub async fn sections(&self, ids: &[String]) -> Result<Vec<Value>> {
        let semester = self.semester.to_string();
        let mut sections = Vec::new();

        for batch in batches(ids, self.batch_size) {
            let url = format!("{}/courses/sections/{}", self.base_url, batch.join(","));
            let found: Vec<Value> = self
                .fetcher
                .get_json(&url, &[("semester", semester.as_str())])
                .await?;

            info!("GET {url} -> {} items", found.len());
            sections.extend(found);
        }

        Ok(sections)
    }

    pub async fn department_sections(&self, dept_id: &str) -> Result<Vec<Value>> {
        let ids: Vec<String> = self
            .courses(dept_id)
            .await?
            .into_iter()
            .flat_map(|course| course.sections)
            .collect();

        info!("Collected {} section IDs for {dept_id}", ids.len());
        if ids.is_empty() {
            info!("  (no sections to fetch)");
            return Ok(Vec::new());
        }

        let sections = self.sections(&ids).await?;
        info!("Fetched {} section objects for {dept_id}", sections.len());

        Ok(sections)
    }

    pub async fn all_sections(&self) -> Result<Vec<Value>> {
        let mut all = Vec::new();

        for department in self.departments().await? {
            info!("--- Dept {} ---", department.dept_id);
            all.extend(self.department_sections(&department.dept_id).await?);
        }

        Ok(all)
    }
}

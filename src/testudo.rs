use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{fetch::Fetcher, parse, Term};

pub const TESTUDO_URL: &str = "https://app.testudo.umd.edu";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub depts: Vec<Department>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub courses: Vec<Course>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub professors: Vec<String>,
}

/// Walks Testudo's Schedule of Classes for one term: departments, then their
/// courses, then the instructors teaching each course.
pub struct Testudo {
    fetcher: Fetcher,
    base_url: String,
    term: Term,
    keep_empty_courses: bool,
}

impl Testudo {
    pub fn new(fetcher: Fetcher, term: Term) -> Self {
        Self {
            fetcher,
            base_url: TESTUDO_URL.to_owned(),
            term,
            keep_empty_courses: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether courses nobody is listed as teaching are kept with an empty
    /// professor list. They are dropped by default.
    pub fn keep_empty_courses(mut self, keep: bool) -> Self {
        self.keep_empty_courses = keep;
        self
    }

    pub fn term(&self) -> Term {
        self.term
    }

    async fn page(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        Ok(self.fetcher.get_text(url, query).await?)
    }

    pub async fn departments(&self) -> Result<Vec<String>> {
        let url = format!("{}/soc/", self.base_url);
        let html = self.page(&url, &[]).await?;

        parse::departments(&html).with_context(|| format!("parsing {url}"))
    }

    pub async fn course_ids(&self, department: &str) -> Result<Vec<String>> {
        let url = format!("{}/soc/{}/{}/", self.base_url, self.term, department);
        let html = self.page(&url, &[]).await?;

        parse::course_ids(&html).with_context(|| format!("parsing {url}"))
    }

    pub async fn instructors(&self, course_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/soc/{}/sections", self.base_url, self.term);
        let html = self.page(&url, &[("courseIds", course_id)]).await?;

        parse::instructors(&html).with_context(|| format!("parsing sections of {course_id}"))
    }

    pub async fn courses(&self, department: &str) -> Result<Vec<Course>> {
        let mut courses = Vec::new();

        for course_id in self.course_ids(department).await? {
            let professors = self.instructors(&course_id).await?;
            debug!("{course_id}: {} instructor(s)", professors.len());

            if professors.is_empty() && !self.keep_empty_courses {
                continue;
            }

            courses.push(Course {
                name: course_id,
                professors,
            });
        }

        Ok(courses)
    }

    pub async fn catalog(&self) -> Result<Catalog> {
        let departments = self.departments().await?;
        info!("{} departments in term {}", departments.len(), self.term);

        let mut catalog = Catalog::default();

        for name in departments {
            let courses = self.courses(&name).await?;
            info!("{name}: {} course(s)", courses.len());

            catalog.depts.push(Department { name, courses });
        }

        Ok(catalog)
    }
}

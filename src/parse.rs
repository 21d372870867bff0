use itertools::Itertools;
use select::{
    document::Document,
    node::Node,
    predicate::{Attr, Class, Descendant, Predicate},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no {field} found (selector `{selector}`)")]
    Missing {
        field: &'static str,
        selector: &'static str,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// A piece of markup the scraper depends on: what it is called, the CSS it
/// corresponds to, and whether a page without it is malformed.
#[derive(Clone, Copy, Debug)]
pub struct Field<P> {
    pub name: &'static str,
    pub selector: &'static str,
    pub predicate: P,
    pub presence: Presence,
}

pub const DEPARTMENT: Field<Descendant<Attr<&str, &str>, Class<&str>>> = Field {
    name: "department",
    selector: "#course-prefixes-page .two",
    predicate: Descendant(Attr("id", "course-prefixes-page"), Class("two")),
    presence: Presence::Required,
};

pub const COURSE_ID: Field<Class<&str>> = Field {
    name: "course id",
    selector: ".course-id",
    predicate: Class("course-id"),
    presence: Presence::Optional,
};

pub const INSTRUCTOR: Field<Class<&str>> = Field {
    name: "instructor",
    selector: ".section-instructors",
    predicate: Class("section-instructors"),
    presence: Presence::Optional,
};

impl<P: Predicate + Clone> Field<P> {
    /// Extracts one value per matching node, in document order.
    pub fn extract<F>(&self, document: &Document, value: F) -> Result<Vec<String>, ParseError>
    where
        F: Fn(&Node) -> String,
    {
        let values: Vec<String> = document
            .find(self.predicate.clone())
            .map(|node| value(&node))
            .collect();

        if values.is_empty() && self.presence == Presence::Required {
            return Err(ParseError::Missing {
                field: self.name,
                selector: self.selector,
            });
        }

        Ok(values)
    }
}

/// The node's inner HTML with surrounding whitespace trimmed, so ids are safe
/// to splice into request URLs.
fn inner_html(node: &Node) -> String {
    node.inner_html().trim().to_owned()
}

/// Every text node below `node`, trimmed, with empty ones dropped.
fn stripped_text(node: &Node) -> String {
    node.descendants()
        .filter_map(|descendant| descendant.as_text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Department prefixes from the Testudo landing page.
pub fn departments(html: &str) -> Result<Vec<String>, ParseError> {
    DEPARTMENT.extract(&Document::from(html), inner_html)
}

/// Course identifiers from a department listing.
pub fn course_ids(html: &str) -> Result<Vec<String>, ParseError> {
    COURSE_ID.extract(&Document::from(html), inner_html)
}

/// Distinct instructor names from a course's section listing, first
/// occurrence first. Instructor elements with no text are skipped, so a course
/// whose only instructor element is blank has no instructors at all.
pub fn instructors(html: &str) -> Result<Vec<String>, ParseError> {
    let names = INSTRUCTOR.extract(&Document::from(html), stripped_text)?;

    Ok(names
        .into_iter()
        .filter(|name| !name.is_empty())
        .unique()
        .collect())
}

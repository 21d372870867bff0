use httpmock::prelude::*;
use terpcord_scraper::{
    parse::ParseError,
    testudo::{Course, Department},
    write_json, Catalog, Encoding, FetchError, Fetcher, Term, Testudo,
};

const SOC_PAGE: &str = r#"
<div id="course-prefixes-page">
  <div class="course-prefix row"><span class="prefix-abbrev two">CMSC</span><span class="prefix-name">Computer Science</span></div>
  <div class="course-prefix row"><span class="prefix-abbrev two">ENGL</span><span class="prefix-name">English</span></div>
</div>
"#;

const CMSC_PAGE: &str = r#"
<div class="courses-container">
  <div class="course" id="CMSC131"><div class="course-id">CMSC131</div></div>
  <div class="course" id="CMSC132"><div class="course-id">CMSC132</div></div>
</div>
"#;

const ENGL_PAGE: &str = r#"<div class="no-courses-message">No courses matched your search filters above.</div>"#;

const CMSC131_SECTIONS: &str = r#"
<div class="sections-container">
  <div class="section"><span class="section-instructors"><span class="section-instructor">Smith</span></span></div>
  <div class="section"><span class="section-instructors"><span class="section-instructor">Smith</span></span></div>
  <div class="section"><span class="section-instructors"><span class="section-instructor">Jones</span></span></div>
</div>
"#;

const CMSC132_SECTIONS: &str = r#"<div class="sections-container"></div>"#;

fn term() -> Term {
    "202508".parse().unwrap()
}

async fn mock_catalog(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/soc/");
            then.status(200).body(SOC_PAGE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/soc/202508/CMSC/");
            then.status(200).body(CMSC_PAGE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/soc/202508/ENGL/");
            then.status(200).body(ENGL_PAGE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/soc/202508/sections")
                .query_param("courseIds", "CMSC131");
            then.status(200).body(CMSC131_SECTIONS);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/soc/202508/sections")
                .query_param("courseIds", "CMSC132");
            then.status(200).body(CMSC132_SECTIONS);
        })
        .await;
}

fn testudo(server: &MockServer) -> Testudo {
    Testudo::new(Fetcher::new().unwrap(), term()).with_base_url(server.base_url())
}

#[tokio::test]
async fn walks_departments_courses_and_instructors() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;

    let catalog = testudo(&server).catalog().await.unwrap();

    assert_eq!(
        catalog,
        Catalog {
            depts: vec![
                Department {
                    name: "CMSC".into(),
                    courses: vec![Course {
                        name: "CMSC131".into(),
                        professors: vec!["Smith".into(), "Jones".into()],
                    }],
                },
                Department {
                    name: "ENGL".into(),
                    courses: vec![],
                },
            ],
        }
    );
}

#[tokio::test]
async fn courses_without_instructors_can_be_kept() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;

    let courses = testudo(&server)
        .keep_empty_courses(true)
        .courses("CMSC")
        .await
        .unwrap();

    let names: Vec<&str> = courses.iter().map(|course| course.name.as_str()).collect();
    assert_eq!(names, ["CMSC131", "CMSC132"]);
    assert!(courses[1].professors.is_empty());
}

#[tokio::test]
async fn output_matches_the_channel_generator_format() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let testudo = testudo(&server);
    write_json(&first, &testudo.catalog().await.unwrap(), Encoding::Ascii).unwrap();
    write_json(&second, &testudo.catalog().await.unwrap(), Encoding::Ascii).unwrap();

    let written = std::fs::read_to_string(&first).unwrap();
    let expected = r#"{
    "depts": [
        {
            "name": "CMSC",
            "courses": [
                {
                    "name": "CMSC131",
                    "professors": [
                        "Smith",
                        "Jones"
                    ]
                }
            ]
        },
        {
            "name": "ENGL",
            "courses": []
        }
    ]
}"#;
    assert_eq!(written, expected);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[tokio::test]
async fn fetch_failures_abort_the_walk() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/soc/");
            then.status(200).body(SOC_PAGE);
        })
        .await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET).path("/soc/202508/CMSC/");
            then.status(500);
        })
        .await;

    let error = testudo(&server).catalog().await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<FetchError>(),
        Some(FetchError::Exhausted { attempts: 3, .. })
    ));
    listing.assert_hits_async(3).await;
}

#[tokio::test]
async fn missing_department_list_is_reported_by_name() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/soc/");
            then.status(200).body("<html><body>Schedule of Classes is unavailable</body></html>");
        })
        .await;

    let error = testudo(&server).catalog().await.unwrap_err();

    assert_eq!(
        error.downcast_ref::<ParseError>(),
        Some(&ParseError::Missing {
            field: "department",
            selector: "#course-prefixes-page .two",
        })
    );
}

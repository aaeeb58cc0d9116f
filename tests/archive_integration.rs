//! Integration tests for year bundling.
//!
//! Papers are served from a mock server and written as zip files into a
//! temporary directory.

use std::io::Read;

use pastpapers_core::archive::ArchiveBuilder;
use pastpapers_core::state::ARCHIVE_UNAVAILABLE_ALERT;
use pastpapers_core::{
    AppState, ArchiveError, FileRecord, HttpClient, HttpFileFetcher, LocalFileFetcher,
    ProjectedYear, SubjectContent, SubjectRecord,
};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> HttpFileFetcher {
    let base = Url::parse(&server.uri()).expect("mock server uri should parse");
    HttpFileFetcher::new(HttpClient::new().expect("client should build"), base)
}

fn year_2020() -> ProjectedYear {
    ProjectedYear {
        year: "2020".to_string(),
        files: vec![
            FileRecord::new("p1.pdf", "papers/phy/2020/p1.pdf"),
            FileRecord::new("p2.pdf", "papers/phy/2020/p2.pdf"),
            FileRecord::new("ans.pdf", "papers/phy/2020/ans.pdf"),
        ],
    }
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("archive should open");
    (0..archive.len())
        .map(|index| {
            let mut entry = archive.by_index(index).expect("entry should exist");
            let mut contents = Vec::new();
            entry
                .read_to_end(&mut contents)
                .expect("entry should read");
            (entry.name().to_string(), contents)
        })
        .collect()
}

#[tokio::test]
async fn test_bundle_skips_missing_file_and_saves_rest() {
    let server = MockServer::start().await;
    for (file_path, body) in [
        ("/papers/phy/2020/p1.pdf", b"paper one".as_slice()),
        ("/papers/phy/2020/ans.pdf", b"answers".as_slice()),
    ] {
        Mock::given(method("GET"))
            .and(path(file_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/papers/phy/2020/p2.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = TempDir::new().expect("failed to create temp dir");
    let builder = ArchiveBuilder::zip_to_directory(fetcher_for(&server), output.path());

    let outcome = builder
        .build_archive(Some("phy"), &year_2020())
        .await
        .expect("bundle should succeed");

    assert_eq!(outcome.filename, "phy_2020.zip");
    assert_eq!(outcome.included, vec!["p1.pdf", "ans.pdf"]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].name, "p2.pdf");

    let saved = std::fs::read(output.path().join("phy_2020.zip")).expect("zip should exist");
    let entries = zip_entries(&saved);
    assert_eq!(
        entries,
        vec![
            ("p1.pdf".to_string(), b"paper one".to_vec()),
            ("ans.pdf".to_string(), b"answers".to_vec()),
        ]
    );
}

#[tokio::test]
async fn test_bundle_does_not_overwrite_existing_archive() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pdf".to_vec()))
        .mount(&server)
        .await;

    let output = TempDir::new().expect("failed to create temp dir");
    std::fs::write(output.path().join("phy_2020.zip"), b"older").expect("seed file");
    let builder = ArchiveBuilder::zip_to_directory(fetcher_for(&server), output.path());

    let outcome = builder
        .build_archive(Some("phy"), &year_2020())
        .await
        .expect("bundle should succeed");

    assert!(outcome.location.ends_with("phy_2020_1.zip"), "{}", outcome.location);
    assert_eq!(
        std::fs::read(output.path().join("phy_2020.zip")).expect("seed file"),
        b"older"
    );
}

#[tokio::test]
async fn test_missing_capability_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let builder = ArchiveBuilder::new(fetcher_for(&server));
    let error = builder
        .build_archive(Some("phy"), &year_2020())
        .await
        .unwrap_err();
    assert!(matches!(error, ArchiveError::CapabilityUnavailable { .. }));

    let subject = SubjectRecord::new("phy", "Physics", SubjectContent::Empty);
    let mut state = AppState::with_subjects(vec![subject]);
    state.select_subject("phy");
    assert!(state.download_year(&builder, &year_2020()).await.is_none());
    assert_eq!(state.alert(), Some(ARCHIVE_UNAVAILABLE_ALERT));
    assert!(state.downloading_year().is_none());
}

#[tokio::test]
async fn test_bundle_from_local_site_checkout() {
    let site = TempDir::new().expect("failed to create temp dir");
    let year_dir = site.path().join("papers/phy/2020");
    std::fs::create_dir_all(&year_dir).expect("create year dir");
    std::fs::write(year_dir.join("p1.pdf"), b"local one").expect("write p1");
    std::fs::write(year_dir.join("ans.pdf"), b"local ans").expect("write ans");

    let output = TempDir::new().expect("failed to create temp dir");
    let builder =
        ArchiveBuilder::zip_to_directory(LocalFileFetcher::new(site.path()), output.path());

    let outcome = builder
        .build_archive(None, &year_2020())
        .await
        .expect("bundle should succeed");

    assert_eq!(outcome.filename, "papers_2020.zip");
    assert_eq!(outcome.included, vec!["p1.pdf", "ans.pdf"]);
    assert_eq!(outcome.skipped[0].reason, "HTTP 404");
}

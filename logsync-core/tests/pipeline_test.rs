//! Integration tests for the page conversion pipeline
//!
//! These tests run whole pages through load, transform and save against a
//! temporary source and destination tree.

use chrono::DateTime;
use indexmap::IndexMap;
use logsync_core::{
    DocumentOptions, FixedClock, Mapping, Page, PageError, PipelineContext, ResolvedRoots,
};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct Repos {
    _dir: TempDir,
    ctx: PipelineContext,
}

impl Repos {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let roots = ResolvedRoots::new(dir.path().join("logseq"), dir.path().join("hugo"));
        fs::create_dir_all(roots.source.join("pages")).unwrap();
        fs::create_dir_all(roots.assets_dir()).unwrap();
        fs::create_dir_all(&roots.destination).unwrap();

        let now = DateTime::parse_from_rfc3339("2024-05-01T08:30:00Z").unwrap();
        let ctx = PipelineContext::new(roots).with_clock(FixedClock(now));
        Self { _dir: dir, ctx }
    }

    fn roots(&self) -> &ResolvedRoots {
        self.ctx.roots()
    }

    fn page(&self, name: &str, content: &str) {
        fs::write(self.roots().source.join("pages").join(name), content).unwrap();
    }

    fn asset(&self, name: &str, bytes: &[u8]) {
        fs::write(self.roots().assets_dir().join(name), bytes).unwrap();
    }
}

fn mapping(source: &str, target: &str, options: DocumentOptions) -> Mapping {
    Mapping {
        source: PathBuf::from(source),
        target: PathBuf::from(target),
        options,
        frontmatter: IndexMap::new(),
    }
}

#[test]
fn test_end_to_end_outline_page() {
    let repos = Repos::new();
    repos.page("Home.md", "- [[Home]]\n- ![img](photo.jpg)\n- \n-");

    let mut mapping = mapping(
        "pages/Home.md",
        "content/home.md",
        DocumentOptions {
            remove_internal_links: true,
            include_attachments: false,
            remove_empty_trails: true,
            ..DocumentOptions::default()
        },
    );
    mapping
        .frontmatter
        .insert("tags".to_string(), serde_yaml::Value::from("notes"));

    let page = repos.ctx.convert(&mapping).unwrap();

    insta::assert_snapshot!(page.output(), @r"
    +++
    tags = 'notes'
    date = '2024-05-01T08:30:00Z'
    title = 'home'
    +++
    - Home
    - ![img](photo.jpg)
    ");
    assert!(page.output().ends_with("+++\n- Home\n- ![img](photo.jpg)"));
}

#[test]
fn test_attachments_are_copied_and_page_saved() {
    let repos = Repos::new();
    repos.page("Trip.md", "- Day one\n\t- ![beach](../assets/beach.jpg)\n-");
    repos.asset("beach.jpg", b"\xff\xd8\xff\xe0jpeg");

    let mapping = mapping(
        "pages/Trip.md",
        "content/posts/trip.md",
        DocumentOptions {
            include_attachments: true,
            remove_empty_trails: true,
            ..DocumentOptions::default()
        },
    );

    let page = repos.ctx.convert(&mapping).unwrap();
    let target = repos.ctx.target_path(&mapping);
    page.save(&target).unwrap();

    let saved = fs::read_to_string(&target).unwrap();
    assert_eq!(saved, page.output());
    assert!(saved.starts_with("+++\n"));
    assert!(saved.contains("title = 'trip'\n"));
    assert!(saved.ends_with("+++\n- Day one\n\t- ![beach](/beach.jpg)"));

    let copied = fs::read(repos.roots().static_dir().join("beach.jpg")).unwrap();
    assert_eq!(copied, b"\xff\xd8\xff\xe0jpeg");
}

#[test]
fn test_latin1_bytes_are_converted_not_rejected() {
    let repos = Repos::new();
    let path = repos.roots().source.join("pages/Cafe.md");
    fs::write(&path, b"- Caf\xe9 [[Home]]\n").unwrap();

    let options = DocumentOptions {
        remove_internal_links: true,
        ..DocumentOptions::default()
    };
    let page = repos
        .ctx
        .convert(&mapping("pages/Cafe.md", "content/cafe.md", options))
        .unwrap();

    assert_eq!(page.input(), "- Caf\u{FFFD} [[Home]]\n");
    assert!(page.output().ends_with("+++\n- Caf\u{FFFD} Home\n"));
    assert!(page.output().contains("title = 'cafe'\n"));
}

#[test]
fn test_missing_attachment_fails_page() {
    let repos = Repos::new();
    repos.page("Broken.md", "- ![gone](../assets/gone.png)");

    let mapping = mapping(
        "pages/Broken.md",
        "content/broken.md",
        DocumentOptions {
            include_attachments: true,
            ..DocumentOptions::default()
        },
    );

    let err = repos.ctx.convert(&mapping).unwrap_err();
    assert!(matches!(err, PageError::MissingAttachment { .. }));
    assert!(!repos.ctx.target_path(&mapping).exists());
}

#[test]
fn test_save_failure_is_reported() {
    let repos = Repos::new();
    let page = Page::new("x.md", "- x");

    // A regular file where a directory is expected
    let blocker = repos.roots().destination.join("content");
    fs::write(&blocker, "not a directory").unwrap();

    let err = page.save(&blocker.join("x.md")).unwrap_err();
    assert!(matches!(err, PageError::Persist { .. }));
}

#[test]
fn test_pages_convert_in_parallel() {
    let repos = Repos::new();
    repos.asset("shared.png", b"png");
    for i in 0..8 {
        repos.page(&format!("P{i}.md"), &format!("- [[Link {i}]] ![s](shared.png)\n-"));
    }

    let options = DocumentOptions {
        remove_internal_links: true,
        include_attachments: true,
        remove_empty_trails: true,
        ..DocumentOptions::default()
    };

    std::thread::scope(|scope| {
        for i in 0..8 {
            let ctx = &repos.ctx;
            let mapping = mapping(
                &format!("pages/P{i}.md"),
                &format!("content/p{i}.md"),
                options.clone(),
            );
            scope.spawn(move || {
                let page = ctx.convert(&mapping).unwrap();
                page.save(&ctx.target_path(&mapping)).unwrap();
                assert!(page.output().ends_with(&format!("- Link {i} ![s](/shared.png)")));
            });
        }
    });

    for i in 0..8 {
        assert!(repos.roots().destination.join(format!("content/p{i}.md")).is_file());
    }
    assert!(repos.roots().static_dir().join("shared.png").is_file());
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_diagnostics_are_emitted_under_page_span() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let repos = Repos::new();
        repos.page("Home.md", "- [[Home]]");
        let mapping = mapping(
            "pages/Home.md",
            "content/home.md",
            DocumentOptions {
                remove_internal_links: true,
                ..DocumentOptions::default()
            },
        );
        let ctx = repos
            .ctx
            .clone()
            .with_span(tracing::info_span!("sync", run = 7));
        ctx.convert(&mapping).unwrap();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("sync{run=7}:page{name=Home}"), "logs: {output}");
    assert!(output.contains("converted page"), "logs: {output}");
    assert!(output.contains("name=Home"), "logs: {output}");
    assert!(output.contains("unwrapping internal links"), "logs: {output}");
}

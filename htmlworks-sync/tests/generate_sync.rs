//! Sync pass behaviour against a real site on disk: idempotence, targeted
//! updates, stale-file deletion, and resource mirroring.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use htmlworks_core::{config, Config};
use htmlworks_renderer::PageRenderer;
use htmlworks_sync::{generate, WriteResult};
use rstest::rstest;
use tempfile::TempDir;

struct Site {
    _tmp: TempDir,
    config: Config,
}

impl Site {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        config::init_at(tmp.path()).expect("init");
        let config = Config::load_at(&tmp.path().join(config::CONFIG_FILE_NAME)).expect("load");
        let site = Site { _tmp: tmp, config };
        site.content("_parts/header.html", "<header>{{ title }}</header>\n");
        site.content(
            "index.html",
            "<!--params{\"title\":\"Home\"}-->{% include \"_parts/header.html\" %}<p>home</p>\n",
        );
        site.content(
            "about/index.html",
            "<!--params{\"title\":\"About\"}-->{% include \"_parts/header.html\" %}<p>about</p>\n",
        );
        site.resource("css/site.css", b"body { margin: 0 }\n");
        site
    }

    fn content(&self, rel: &str, body: &str) {
        write(&self.config.directories.contents, rel, body.as_bytes());
    }

    fn resource(&self, rel: &str, body: &[u8]) {
        write(&self.config.directories.resources, rel, body);
    }

    fn out(&self, rel: &str) -> PathBuf {
        self.config.directories.generate.join(rel)
    }
}

fn write(root: &Path, rel: &str, body: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write");
}

fn age_all(paths: &[PathBuf]) -> FileTime {
    let old = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(24 * 60 * 60));
    for path in paths {
        set_file_mtime(path, old).expect("set old mtime");
    }
    old
}

fn mtime(path: &Path) -> FileTime {
    FileTime::from_last_modification_time(&fs::metadata(path).expect("metadata"))
}

#[test]
fn first_run_creates_mirror_of_contents_and_resources() {
    let site = Site::new();
    let report = generate(&site.config).expect("generate");

    assert_eq!(report.created(), 3);
    assert_eq!(report.failed(), 0);
    assert_eq!(
        fs::read_to_string(site.out("index.html")).unwrap(),
        "<header>Home</header>\n<p>home</p>\n"
    );
    assert_eq!(
        fs::read_to_string(site.out("about/index.html")).unwrap(),
        "<header>About</header>\n<p>about</p>\n"
    );
    assert_eq!(
        fs::read(site.out("resources/css/site.css")).unwrap(),
        b"body { margin: 0 }\n"
    );
    assert!(!site.out("_parts").exists());
}

#[test]
fn second_run_is_idempotent() {
    let site = Site::new();
    generate(&site.config).expect("first");
    let outputs = [
        site.out("index.html"),
        site.out("about/index.html"),
        site.out("resources/css/site.css"),
    ];
    let old = age_all(&outputs);

    let report = generate(&site.config).expect("second");
    assert_eq!(report.writes(), 0);
    assert_eq!(report.unchanged(), 3);
    for path in &outputs {
        assert_eq!(mtime(path), old, "{} was rewritten", path.display());
    }
}

#[test]
fn changing_one_page_updates_only_that_output() {
    let site = Site::new();
    generate(&site.config).expect("first");
    let old = age_all(&[site.out("index.html"), site.out("about/index.html")]);

    site.content(
        "about/index.html",
        "<!--params{\"title\":\"About us\"}-->{% include \"_parts/header.html\" %}<p>about</p>\n",
    );
    let report = generate(&site.config).expect("second");

    assert_eq!(report.updated(), 1);
    assert!(matches!(
        report.get("about/index.html"),
        Some(WriteResult::Updated { .. })
    ));
    assert_eq!(mtime(&site.out("index.html")), old, "sibling was rewritten");

    let fresh = PageRenderer::load(&site.config.directories.contents)
        .expect("load")
        .render_file(&site.config.directories.contents, &"about/index.html".into())
        .expect("render");
    assert_eq!(fs::read(site.out("about/index.html")).unwrap(), fresh);
}

#[test]
fn editing_a_partial_updates_every_page_that_includes_it() {
    let site = Site::new();
    generate(&site.config).expect("first");

    site.content("_parts/header.html", "<header class=\"x\">{{ title }}</header>\n");
    let report = generate(&site.config).expect("second");
    assert_eq!(report.updated(), 2);
    assert_eq!(report.unchanged(), 1, "the stylesheet is untouched");
}

#[test]
fn modified_resource_updates_only_its_copy() {
    let site = Site::new();
    site.resource("img/logo.png", &[0x89, 0x50, 0x4e, 0x47]);
    generate(&site.config).expect("first");
    let old = age_all(&[site.out("resources/css/site.css")]);

    site.resource("img/logo.png", &[0x89, 0x50, 0x4e, 0x47, 0x0d]);
    let report = generate(&site.config).expect("second");

    assert!(matches!(
        report.get("resources/img/logo.png"),
        Some(WriteResult::Updated { .. })
    ));
    assert_eq!(report.updated(), 1);
    assert_eq!(mtime(&site.out("resources/css/site.css")), old);
    assert_eq!(
        fs::read(site.out("resources/img/logo.png")).unwrap(),
        [0x89, 0x50, 0x4e, 0x47, 0x0d]
    );
}

#[test]
fn deleted_source_removes_its_output() {
    let site = Site::new();
    generate(&site.config).expect("first");

    fs::remove_file(site.config.directories.contents.join("about/index.html")).unwrap();
    let report = generate(&site.config).expect("second");

    assert_eq!(report.deleted(), 1);
    assert!(matches!(
        report.get("about/index.html"),
        Some(WriteResult::Deleted { .. })
    ));
    assert!(!site.out("about/index.html").exists());
    assert!(!site.out("about").exists(), "empty directory left behind");
    assert!(site.out("index.html").exists());
}

#[test]
fn deletion_disabled_reports_stale_and_keeps_file() {
    let mut site = Site::new();
    generate(&site.config).expect("first");
    site.config.generate.delete = false;

    fs::remove_file(site.config.directories.contents.join("about/index.html")).unwrap();
    let report = generate(&site.config).expect("second");

    assert_eq!(report.deleted(), 0);
    assert_eq!(report.stale(), 1);
    assert!(site.out("about/index.html").exists());
}

#[test]
fn foreign_files_in_generate_root_are_removed_but_dotfiles_survive() {
    let site = Site::new();
    generate(&site.config).expect("first");
    write(&site.config.directories.generate, "orphan.html", b"x");
    write(&site.config.directories.generate, ".git/HEAD", b"ref");
    write(&site.config.directories.generate, ".nojekyll", b"");

    let report = generate(&site.config).expect("second");
    assert_eq!(report.deleted(), 1);
    assert!(!site.out("orphan.html").exists());
    assert!(site.out(".git/HEAD").exists());
    assert!(site.out(".nojekyll").exists());
}

#[rstest]
#[case::syntax("{% if %}")]
#[case::execution("{{ undefined_var }}")]
fn failing_page_does_not_abort_batch_or_lose_old_output(#[case] body: &str) {
    let site = Site::new();
    generate(&site.config).expect("first");
    let before = fs::read(site.out("about/index.html")).unwrap();

    site.content("about/index.html", body);
    site.content("new.html", "<p>new</p>");
    let report = generate(&site.config).expect("second");

    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.get("about/index.html"),
        Some(WriteResult::Failed { .. })
    ));
    assert_eq!(report.created(), 1, "other pages still generated");
    assert_eq!(report.deleted(), 0, "failed page output is not stale");
    assert_eq!(fs::read(site.out("about/index.html")).unwrap(), before);
}

#[test]
fn malformed_params_render_with_empty_context() {
    let site = Site::new();
    site.content("plain.html", "<!--params{not json-->plain\n");
    let report = generate(&site.config).expect("generate");
    assert_eq!(report.failed(), 0);
    assert_eq!(fs::read_to_string(site.out("plain.html")).unwrap(), "plain\n");
}

#[test]
#[cfg(unix)]
fn failed_delete_aborts_the_pass() {
    use std::os::unix::fs::PermissionsExt;

    let site = Site::new();
    generate(&site.config).expect("first");
    write(&site.config.directories.generate, "locked/orphan.html", b"x");
    let locked = site.out("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let canary = locked.join("canary");
    let writable_anyway = fs::write(&canary, b"").is_ok();
    let _ = fs::remove_file(&canary);

    let result = generate(&site.config);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !writable_anyway {
        assert!(result.is_err(), "delete failure must be fatal");
        assert!(site.out("locked/orphan.html").exists());
    }
}

#[test]
#[cfg(unix)]
fn dangling_partial_only_fails_pages_that_include_it() {
    let site = Site::new();
    let parts = site.config.directories.contents.join("_parts");
    std::os::unix::fs::symlink(parts.join("missing.html"), parts.join("gone.html")).expect("symlink");
    site.content("uses-gone.html", "{% include \"_parts/gone.html\" %}");

    let report = generate(&site.config).expect("dangling partial must not abort the pass");

    assert!(matches!(
        report.get("uses-gone.html"),
        Some(WriteResult::Failed { .. })
    ));
    assert_eq!(report.failed(), 1);
    assert!(matches!(report.get("index.html"), Some(WriteResult::Created { .. })));
    assert!(site.out("about/index.html").is_file());
}

#[test]
#[cfg(target_os = "linux")]
fn non_utf8_file_names_are_skipped_not_fatal() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let site = Site::new();
    let contents = &site.config.directories.contents;
    let resources = &site.config.directories.resources;
    fs::write(contents.join(OsStr::from_bytes(b"caf\xe9.html")), "<p>cafe</p>").expect("write page");
    fs::write(resources.join(OsStr::from_bytes(b"logo\xe9.png")), b"\x89PNG").expect("write resource");

    let report = generate(&site.config).expect("generate");

    assert_eq!(report.failed(), 0);
    assert_eq!(report.created(), 3);
    assert!(site.out("index.html").is_file());
    assert!(site.out("resources/css/site.css").is_file());
}

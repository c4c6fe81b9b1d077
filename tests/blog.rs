//! End-to-end behaviour of the `Blog` facade over a scratch directory

use inkwell::content::{FrontMatter, Post};
use inkwell::store::ErrorKind;
use inkwell::Blog;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

fn post(title: &str, date: &str, tags: &[&str]) -> FrontMatter {
    FrontMatter {
        title: Some(title.to_string()),
        date: Some(date.to_string()),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        published: Some(true),
        ..Default::default()
    }
}

fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

#[test]
fn test_write_then_read_raw() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    let mut fm = post("Hello World", "2024-05-01", &["rust"]);
    fm.category = Some("Tech".to_string());

    let slug = blog.save_post(None, &fm, "Body *text*\n").unwrap();
    assert_eq!(slug, "hello-world");

    let record = blog.read_raw(&slug).unwrap();
    assert_eq!(record.front_matter, fm);
    assert_eq!(record.body, "Body *text*\n");
}

#[test]
fn test_create_conflict_keeps_existing() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    let fm = post("Same Title", "2024-05-01", &[]);
    blog.save_post(None, &fm, "first").unwrap();

    let err = blog.save_post(None, &fm, "second").unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(blog.read_raw("same-title").unwrap().body, "first");
}

#[test]
fn test_delete_then_read() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    let slug = blog
        .save_post(None, &post("Gone", "2024-05-01", &[]), "x")
        .unwrap();

    blog.delete_post(&slug).unwrap();
    assert_eq!(blog.read_raw(&slug).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(blog.get_post_by_slug(&slug).unwrap().is_none());
}

#[test]
fn test_publish_flag_filtering() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    blog.ensure_ready().unwrap();
    fs::write(
        blog.posts_dir.join("draft.md"),
        "---\ntitle: Draft\npublished: false\n---\nhidden",
    )
    .unwrap();
    fs::write(blog.posts_dir.join("bare.md"), "---\ntitle: Bare\n---\nshown").unwrap();

    let posts = blog.get_all_posts().unwrap();
    assert_eq!(slugs(&posts), vec!["bare"]);
    // Lookup by slug still finds the draft, flagged as unpublished
    let draft = blog.get_post_by_slug("draft.md").unwrap().unwrap();
    assert_eq!(draft.title, "Draft");
    assert!(!draft.published);

    // The management view counts an absent flag as a draft
    let summaries = blog.list_summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| !s.published));
}

#[test]
fn test_queries_over_collection() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    let mut a = post("A", "2024-01-01", &["x", "y"]);
    a.category = Some("c1".to_string());
    let mut b = post("B", "2024-02-01", &["y"]);
    b.category = Some("c2".to_string());
    let mut c = post("C", "2024-03-01", &["z"]);
    c.category = Some("c1".to_string());
    blog.save_post(None, &a, "alpha").unwrap();
    blog.save_post(None, &b, "beta").unwrap();
    blog.save_post(None, &c, "gamma").unwrap();

    let all = blog.get_all_posts().unwrap();
    assert_eq!(slugs(&all), vec!["c", "b", "a"]);

    // Both candidates qualify, so they keep list order
    let a = blog.get_post_by_slug("a.md").unwrap().unwrap();
    let related = blog.get_related_posts(&a, 2).unwrap();
    assert_eq!(slugs(&related), vec!["c", "b"]);

    assert_eq!(blog.get_all_tags().unwrap(), vec!["x", "y", "z"]);
    assert_eq!(blog.get_all_categories().unwrap(), vec!["c1", "c2"]);
    assert_eq!(
        slugs(&blog.get_posts_by_tag("Y").unwrap()),
        slugs(&blog.get_posts_by_tag("y").unwrap())
    );
    assert_eq!(slugs(&blog.get_posts_by_category("C1").unwrap()), vec!["c", "a"]);

    let found = blog.search_posts("GAMMA").unwrap();
    assert_eq!(slugs(&found), vec!["c"]);
    assert!(found.iter().all(|p| all.iter().any(|q| q.slug == p.slug)));

    let page = blog.get_posts_with_pagination(2, 2).unwrap();
    assert_eq!(slugs(&page.posts), vec!["a"]);
    assert_eq!(page.total_pages, 2);
    assert!(!page.has_next_page);
    assert!(page.has_previous_page);

    assert_eq!(slugs(&blog.get_featured_posts(1).unwrap()), vec!["c"]);
}

#[test]
fn test_default_category_fills_in() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    blog.save_post(None, &post("Loose", "2024-01-01", &[]), "x").unwrap();
    assert_eq!(blog.get_all_categories().unwrap(), vec!["General"]);
}

#[test]
fn test_index_follows_mutations() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    assert!(blog.get_all_posts().unwrap().is_empty());

    blog.save_post(None, &post("First", "2024-01-01", &[]), "one").unwrap();
    assert_eq!(blog.get_all_posts().unwrap().len(), 1);

    blog.rename_post("first", "renamed").unwrap();
    assert!(blog.get_post_by_slug("first").unwrap().is_none());
    assert!(blog.get_post_by_slug("renamed").unwrap().is_some());

    blog.delete_post("renamed").unwrap();
    assert!(blog.get_all_posts().unwrap().is_empty());
}

#[test]
fn test_rename_onto_existing_fails() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    blog.save_post(None, &post("One", "2024-01-01", &[]), "one").unwrap();
    blog.save_post(None, &post("Two", "2024-01-02", &[]), "two").unwrap();

    let err = blog.rename_post("one", "two").unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(blog.read_raw("one").unwrap().body, "one");
    assert_eq!(blog.read_raw("two").unwrap().body, "two");
}

#[test]
fn test_save_edit_moves_record() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    blog.save_post(None, &post("Old Name", "2024-01-01", &[]), "v1").unwrap();

    let fm = post("New Name", "2024-01-01", &[]);
    let slug = blog.save_edit("old-name", &fm, "v2").unwrap();
    assert_eq!(slug, "new-name");
    assert!(blog.read_raw("old-name").unwrap_err().is_not_found());
    assert_eq!(blog.read_raw("new-name").unwrap().body, "v2");
}

#[test]
fn test_save_edit_onto_taken_slug_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    blog.save_post(None, &post("Old Name", "2024-01-01", &[]), "v1").unwrap();
    blog.save_post(None, &post("Taken", "2024-01-02", &[]), "other").unwrap();

    let err = blog
        .save_edit("old-name", &post("Taken", "2024-01-01", &[]), "v2")
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(blog.read_raw("old-name").unwrap().body, "v1");
    assert_eq!(blog.read_raw("taken").unwrap().body, "other");

    let err = blog
        .save_edit("missing", &post("Brand New", "2024-01-01", &[]), "v3")
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!blog.store().exists("brand-new"));
}

#[test]
fn test_import_glob() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    let source = dir.path().join("incoming");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("notes.md"), "# Field Notes\n\nSome words here.").unwrap();
    fs::write(source.join("skip.txt"), "not markdown").unwrap();

    let pattern = format!("{}/*", source.display());
    let report = blog.import_glob(&[pattern]).unwrap();
    assert_eq!(report.imported, vec!["field-notes"]);
    assert_eq!(report.failed.len(), 1);

    let record = blog.read_raw("field-notes").unwrap();
    assert_eq!(record.front_matter.published, Some(false));
    assert!(blog.get_all_posts().unwrap().is_empty());
}

#[test]
fn test_index_stays_fresh_under_concurrent_reads() {
    let dir = TempDir::new().unwrap();
    let blog = Blog::new(dir.path()).unwrap();
    for i in 0..50 {
        let title = format!("Seed {}", i);
        blog.save_post(None, &post(&title, "2024-01-01", &[]), "seed").unwrap();
    }

    let done = AtomicBool::new(false);
    std::thread::scope(|scope| {
        let reader = blog.clone();
        let done = &done;
        scope.spawn(move || {
            while !done.load(Ordering::SeqCst) {
                reader.get_all_posts().unwrap();
            }
        });

        for i in 0..30 {
            let title = format!("Fresh {}", i);
            blog.save_post(None, &post(&title, "2024-02-01", &[]), "fresh").unwrap();
            blog.get_all_posts().unwrap();
        }
        done.store(true, Ordering::SeqCst);
    });

    assert_eq!(blog.store().slugs().unwrap().len(), 80);
    assert_eq!(blog.get_all_posts().unwrap().len(), 80);
}

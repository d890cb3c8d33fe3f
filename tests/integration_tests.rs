use medley::models::{MediaType, UnifiedMediaItem};
use medley::services::dashboard::{self, DashboardQuery, SortKey, TypeFilter};
use medley::services::folders::{self, FolderError};
use medley::services::library::{
    self, FolderScope, MoveError, NewDocument, NewImage, NewVideo, SourceFilter,
};
use medley::services::stats;
use medley::Database;
use std::path::Path;

fn create_test_db() -> Database {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let id: u32 = rng.gen();
    let name = format!("test_db_{}", id);

    let db = Database::open_memory(&name).expect("Failed to create test database");
    db.migrate().expect("Failed to run migrations");
    db
}

fn media_dir() -> &'static Path {
    Path::new("/nonexistent-media-dir")
}

fn add_image(db: &Database, title: &str, folder_id: Option<i64>) -> i64 {
    library::create_image(
        db,
        &NewImage {
            title,
            file_path: "unused.jpg",
            width: Some(800),
            height: Some(600),
            copyright_holder: None,
            folder_id,
        },
    )
    .expect("Failed to create image")
}

fn add_document(db: &Database, title: &str, folder_id: Option<i64>) -> i64 {
    library::create_document(
        db,
        &NewDocument {
            title,
            file_path: "unused.pdf",
            version: None,
            department: None,
            expiry_date: None,
            folder_id,
        },
    )
    .expect("Failed to create document")
}

fn add_video(db: &Database, title: &str, folder_id: Option<i64>) -> i64 {
    library::create_video(
        db,
        &NewVideo {
            title,
            file_path: "unused.mp4",
            thumbnail_path: None,
            duration: None,
            resolution: None,
            director: None,
            folder_id,
        },
    )
    .expect("Failed to create video")
}

fn set_created_at(db: &Database, table: &str, id: i64, created_at: Option<&str>) {
    let conn = db.get().unwrap();
    conn.execute(
        &format!("UPDATE {} SET created_at = ? WHERE id = ?", table),
        (created_at, id),
    )
    .unwrap();
}

fn item_titles(items: &[UnifiedMediaItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

mod folder_tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let db = create_test_db();

        let first = folders::seed_default_folders(&db).unwrap();
        assert_eq!(first, 8);

        let second = folders::seed_default_folders(&db).unwrap();
        assert_eq!(second, 0);

        let roots = folders::list_children(&db, None).unwrap();
        assert_eq!(roots.len(), 8);
        assert!(roots.iter().all(|f| f.is_system));
    }

    #[test]
    fn test_seeded_folders_keep_order() {
        let db = create_test_db();
        folders::seed_default_folders(&db).unwrap();

        let roots = folders::list_children(&db, None).unwrap();
        assert_eq!(roots[0].name, "Banners");
        assert_eq!(roots[7].name, "Documents");
    }

    #[test]
    fn test_create_folder_requires_name() {
        let db = create_test_db();
        let result = folders::create_folder(&db, "   ", None, "", None);
        assert!(matches!(result, Err(FolderError::NameRequired)));
    }

    #[test]
    fn test_create_folder_generates_slug() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Q3 Assets!", None, "", None).unwrap();
        assert_eq!(folder.slug, "q3-assets");
        assert!(!folder.is_system);
    }

    #[test]
    fn test_create_folder_missing_parent_degrades_to_root() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Orphan", Some(999), "", None).unwrap();
        assert_eq!(folder.parent_id, None);
    }

    #[test]
    fn test_rename_folder_regenerates_slug() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Old Name", None, "", None).unwrap();

        let renamed = folders::rename_folder(&db, folder.id, "Brand New").unwrap();
        assert_eq!(renamed.name, "Brand New");
        assert_eq!(renamed.slug, "brand-new");
    }

    #[test]
    fn test_rename_folder_requires_name() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Keep", None, "", None).unwrap();
        let result = folders::rename_folder(&db, folder.id, "");
        assert!(matches!(result, Err(FolderError::NameRequired)));
    }

    #[test]
    fn test_breadcrumbs_form_contiguous_path() {
        let db = create_test_db();
        let a = folders::create_folder(&db, "A", None, "", None).unwrap();
        let b = folders::create_folder(&db, "B", Some(a.id), "", None).unwrap();
        let c = folders::create_folder(&db, "C", Some(b.id), "", None).unwrap();

        let chain = folders::breadcrumbs(&db, &c).unwrap();
        let names: Vec<&str> = chain.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        // No duplicates anywhere in the chain.
        let mut ids: Vec<i64> = chain.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), chain.len());
    }

    #[test]
    fn test_delete_empty_leaf_folder() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Scratch", None, "", None).unwrap();

        assert!(folders::can_delete(&db, &folder).unwrap());
        let deleted = folders::delete_folder(&db, folder.id).unwrap();
        assert_eq!(deleted.id, folder.id);
        assert!(folders::get_folder(&db, folder.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_refused_with_child_folder() {
        let db = create_test_db();
        let parent = folders::create_folder(&db, "Parent", None, "", None).unwrap();
        folders::create_folder(&db, "Child", Some(parent.id), "", None).unwrap();

        assert!(!folders::can_delete(&db, &parent).unwrap());
        let result = folders::delete_folder(&db, parent.id);
        assert!(matches!(result, Err(FolderError::NotDeletable)));
    }

    #[test]
    fn test_delete_refused_with_assigned_media() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Full", None, "", None).unwrap();
        let video_id = add_video(&db, "Clip", Some(folder.id));

        let result = folders::delete_folder(&db, folder.id);
        assert!(matches!(result, Err(FolderError::NotDeletable)));

        // Emptying the folder makes it deletable again.
        library::move_record(&db, MediaType::Video, video_id, None).unwrap();
        assert!(folders::delete_folder(&db, folder.id).is_ok());
    }

    #[test]
    fn test_delete_refused_for_system_folder() {
        let db = create_test_db();
        folders::seed_default_folders(&db).unwrap();
        let banners = folders::list_children(&db, None)
            .unwrap()
            .into_iter()
            .find(|f| f.name == "Banners")
            .unwrap();

        let result = folders::delete_folder(&db, banners.id);
        assert!(matches!(result, Err(FolderError::NotDeletable)));
    }

    #[test]
    fn test_delete_missing_folder_reports_not_found() {
        let db = create_test_db();
        let result = folders::delete_folder(&db, 12345);
        assert!(matches!(result, Err(FolderError::NotFound)));
    }

    #[test]
    fn test_can_delete_matches_guard_for_generated_trees() {
        use rand::Rng;
        let db = create_test_db();
        let mut rng = rand::thread_rng();

        for i in 0..20 {
            let folder =
                folders::create_folder(&db, &format!("Gen {}", i), None, "", None).unwrap();
            let children = rng.gen_range(0..3);
            let records = rng.gen_range(0..3);

            for c in 0..children {
                folders::create_folder(&db, &format!("Gen {} child {}", i, c), Some(folder.id), "", None)
                    .unwrap();
            }
            for r in 0..records {
                add_image(&db, &format!("Gen {} media {}", i, r), Some(folder.id));
            }

            let expected = children == 0 && records == 0;
            assert_eq!(folders::can_delete(&db, &folder).unwrap(), expected);
            assert_eq!(folders::delete_folder(&db, folder.id).is_ok(), expected);
        }
    }

    #[test]
    fn test_move_folder_reparents() {
        let db = create_test_db();
        let a = folders::create_folder(&db, "A", None, "", None).unwrap();
        let b = folders::create_folder(&db, "B", None, "", None).unwrap();

        let moved = folders::move_folder(&db, b.id, Some(a.id)).unwrap();
        assert_eq!(moved.parent_id, Some(a.id));

        let children = folders::list_children(&db, Some(a.id)).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, b.id);
    }

    #[test]
    fn test_move_folder_refuses_cycles() {
        let db = create_test_db();
        let a = folders::create_folder(&db, "A", None, "", None).unwrap();
        let b = folders::create_folder(&db, "B", Some(a.id), "", None).unwrap();
        let c = folders::create_folder(&db, "C", Some(b.id), "", None).unwrap();

        // Into itself.
        let result = folders::move_folder(&db, a.id, Some(a.id));
        assert!(matches!(result, Err(FolderError::IntoOwnSubtree)));

        // Into its own grandchild.
        let result = folders::move_folder(&db, a.id, Some(c.id));
        assert!(matches!(result, Err(FolderError::IntoOwnSubtree)));

        // A sideways move is fine.
        assert!(folders::move_folder(&db, c.id, Some(a.id)).is_ok());
    }
}

mod library_tests {
    use super::*;

    #[test]
    fn test_move_record_between_folders() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Target", None, "", None).unwrap();
        let image_id = add_image(&db, "Poster", None);

        library::move_record(&db, MediaType::Image, image_id, Some(folder.id)).unwrap();

        let in_folder = library::list_images(
            &db,
            &SourceFilter {
                folder: FolderScope::In(folder.id),
                category: None,
                search: None,
            },
        )
        .unwrap();
        assert_eq!(in_folder.len(), 1);
        assert_eq!(in_folder[0].id, image_id);

        // The null sentinel moves it back to unfiled.
        library::move_record(&db, MediaType::Image, image_id, None).unwrap();

        let unfiled = library::list_images(
            &db,
            &SourceFilter {
                folder: FolderScope::Unfiled,
                category: None,
                search: None,
            },
        )
        .unwrap();
        assert_eq!(unfiled.len(), 1);
        let in_folder = library::list_images(
            &db,
            &SourceFilter {
                folder: FolderScope::In(folder.id),
                category: None,
                search: None,
            },
        )
        .unwrap();
        assert!(in_folder.is_empty());
    }

    #[test]
    fn test_move_record_missing_is_reported() {
        let db = create_test_db();
        let result = library::move_record(&db, MediaType::Image, 999, None);
        assert!(matches!(result, Err(MoveError::RecordNotFound)));
    }

    #[test]
    fn test_move_record_unknown_type_is_reported() {
        let db = create_test_db();
        add_image(&db, "Exists", None);
        let result = library::move_record(&db, MediaType::parse("podcast"), 1, None);
        assert!(matches!(result, Err(MoveError::RecordNotFound)));
    }

    #[test]
    fn test_move_record_to_missing_folder_degrades_to_unfiled() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Home", None, "", None).unwrap();
        let id = add_image(&db, "Drifter", Some(folder.id));

        library::move_record(&db, MediaType::Image, id, Some(4242)).unwrap();

        let record = library::get_image(&db, id).unwrap().unwrap();
        assert_eq!(record.folder_id, None);
    }

    #[test]
    fn test_search_matches_title_or_tag_without_duplicates() {
        let db = create_test_db();
        let sunset_id = add_image(&db, "Sunset over harbor", None);
        let tagged_id = add_image(&db, "Untitled shoot", None);
        add_image(&db, "Office interior", None);

        let tag = library::create_tag(&db, "sunset colors").unwrap();
        library::assign_tag(&db, MediaType::Image, tagged_id, tag).unwrap();
        // Also tag the record whose title already matches; the result
        // must still contain it once.
        library::assign_tag(&db, MediaType::Image, sunset_id, tag).unwrap();

        let results = library::list_images(
            &db,
            &SourceFilter {
                folder: FolderScope::Unfiled,
                category: None,
                search: Some("sunset"),
            },
        )
        .unwrap();

        let mut ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![sunset_id, tagged_id]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let db = create_test_db();
        add_image(&db, "QUARTERLY Report Banner", None);

        let results = library::list_images(
            &db,
            &SourceFilter {
                folder: FolderScope::Unfiled,
                category: None,
                search: Some("quarterly"),
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_category_filter_joins_on_slug() {
        let db = create_test_db();
        let tagged = add_image(&db, "Catalog shot", None);
        add_image(&db, "Untagged shot", None);

        let category = library::create_category(&db, "Product Shots").unwrap();
        library::assign_category(&db, MediaType::Image, tagged, category).unwrap();

        let results = library::list_images(
            &db,
            &SourceFilter {
                folder: FolderScope::Unfiled,
                category: Some("product-shots"),
                search: None,
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, tagged);
        assert_eq!(results[0].categories.len(), 1);
        assert_eq!(results[0].categories[0].slug, "product-shots");
    }

    #[test]
    fn test_documents_ignore_category_filter() {
        let db = create_test_db();
        add_document(&db, "Policy", None);

        let results = library::list_documents(
            &db,
            &SourceFilter {
                folder: FolderScope::Unfiled,
                category: Some("anything"),
                search: None,
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_get_record_dispatches_by_type() {
        let db = create_test_db();
        let image_id = add_image(&db, "Picture", None);
        let doc_id = add_document(&db, "Sheet", None);

        let record = library::get_record(&db, MediaType::Image, image_id)
            .unwrap()
            .unwrap();
        assert_eq!(record.media_type(), MediaType::Image);
        assert_eq!(record.title(), "Picture");

        let record = library::get_record(&db, MediaType::Document, doc_id)
            .unwrap()
            .unwrap();
        assert_eq!(record.media_type(), MediaType::Document);

        assert!(library::get_record(&db, MediaType::Unknown, image_id)
            .unwrap()
            .is_none());
        assert!(library::get_record(&db, MediaType::Video, image_id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_documents_do_not_accept_categories() {
        let db = create_test_db();
        let id = add_document(&db, "Policy", None);
        let category = library::create_category(&db, "Misfiled").unwrap();
        assert!(library::assign_category(&db, MediaType::Document, id, category).is_err());
    }
}

mod dashboard_tests {
    use super::*;

    #[test]
    fn test_root_shows_only_unfiled_items() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Filed", None, "", None).unwrap();
        add_image(&db, "Filed image", Some(folder.id));
        add_image(&db, "Loose image", None);

        let page = dashboard::query(&db, media_dir(), &DashboardQuery::default()).unwrap();
        assert_eq!(item_titles(&page.items), vec!["Loose image"]);
        assert_eq!(page.stats.total, 1);
    }

    #[test]
    fn test_folder_scope_limits_every_source() {
        let db = create_test_db();
        let folder = folders::create_folder(&db, "Campaign", None, "", None).unwrap();
        add_image(&db, "In folder", Some(folder.id));
        add_video(&db, "Also in folder", Some(folder.id));
        add_document(&db, "Elsewhere", None);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                folder: Some(folder.id),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(page.stats.total, 2);
        assert_eq!(page.stats.images, 1);
        assert_eq!(page.stats.videos, 1);
        assert_eq!(page.stats.documents, 0);
        assert_eq!(page.folder.current.as_ref().map(|f| f.id), Some(folder.id));
        assert_eq!(page.folder.breadcrumbs.len(), 1);
    }

    #[test]
    fn test_missing_folder_id_degrades_to_root_context() {
        let db = create_test_db();
        add_image(&db, "Loose image", None);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                folder: Some(777),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(page.folder.current.is_none());
        assert_eq!(page.stats.total, 1);
    }

    #[test]
    fn test_type_filter_narrows_items_but_not_tab_counts() {
        let db = create_test_db();
        add_image(&db, "Picture", None);
        add_video(&db, "Clip", None);
        add_document(&db, "Sheet", None);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                media_type: TypeFilter::Only(MediaType::Video),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(item_titles(&page.items), vec!["Clip"]);
        assert_eq!(page.stats.total, 1);
        // Tab counts still cover the whole scope.
        assert_eq!(page.stats.images, 1);
        assert_eq!(page.stats.videos, 1);
        assert_eq!(page.stats.documents, 1);
    }

    #[test]
    fn test_merged_sort_across_sources() {
        let db = create_test_db();
        let image = add_image(&db, "bravo", None);
        let video = add_video(&db, "Alpha", None);
        let doc = add_document(&db, "charlie", None);
        set_created_at(&db, "images", image, Some("2024-01-02 00:00:00"));
        set_created_at(&db, "videos", video, Some("2024-01-03 00:00:00"));
        set_created_at(&db, "documents", doc, None);

        let page = dashboard::query(&db, media_dir(), &DashboardQuery::default()).unwrap();
        // Default sort: newest first, missing timestamps last.
        assert_eq!(item_titles(&page.items), vec!["Alpha", "bravo", "charlie"]);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                sort: SortKey::TitleAsc,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(item_titles(&page.items), vec!["Alpha", "bravo", "charlie"]);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                sort: SortKey::TitleDesc,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(item_titles(&page.items), vec!["charlie", "bravo", "Alpha"]);
    }

    #[test]
    fn test_pagination_clamps_out_of_range_pages() {
        let db = create_test_db();
        for i in 0..3 {
            add_image(&db, &format!("Image {}", i), None);
        }

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                page: 9999,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn test_pagination_slices_at_24() {
        let db = create_test_db();
        for i in 0..30 {
            add_image(&db, &format!("Image {:02}", i), None);
        }

        let page = dashboard::query(&db, media_dir(), &DashboardQuery::default()).unwrap();
        assert_eq!(page.items.len(), 24);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                page: 9999,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 6);
        assert!(page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let db = create_test_db();
        add_image(&db, "Only", None);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                page: 0,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_search_scope_applies_to_tab_counts() {
        let db = create_test_db();
        add_image(&db, "Sunset banner", None);
        add_image(&db, "Office", None);
        add_video(&db, "Sunset timelapse", None);

        let page = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                search: Some("sunset".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(page.stats.total, 2);
        assert_eq!(page.stats.images, 1);
        assert_eq!(page.stats.videos, 1);
        assert_eq!(page.stats.documents, 0);
    }

    #[test]
    fn test_end_to_end_seeded_library() {
        let db = create_test_db();
        folders::seed_default_folders(&db).unwrap();
        let banners = folders::list_children(&db, None)
            .unwrap()
            .into_iter()
            .find(|f| f.name == "Banners")
            .unwrap();

        add_image(&db, "Spring banner", Some(banners.id));
        add_image(&db, "Loose photo", None);
        add_video(&db, "Loose clip", None);

        // Root view: only the unfiled image and video.
        let root = dashboard::query(&db, media_dir(), &DashboardQuery::default()).unwrap();
        assert_eq!(root.stats.total, 2);
        assert_eq!(root.stats.images, 1);
        assert_eq!(root.stats.videos, 1);
        assert_eq!(root.folder.subfolders.len(), 8);

        // Banners view: exactly the banner image.
        let in_banners = dashboard::query(
            &db,
            media_dir(),
            &DashboardQuery {
                folder: Some(banners.id),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(item_titles(&in_banners.items), vec!["Spring banner"]);
        assert_eq!(in_banners.items[0].media_type, MediaType::Image);
    }
}

mod stats_tests {
    use super::*;

    #[test]
    fn test_library_totals() {
        let db = create_test_db();
        add_image(&db, "One", None);
        add_image(&db, "Two", None);
        add_document(&db, "Doc", None);
        add_video(&db, "Clip", None);

        let stats = stats::library_stats(&db).unwrap();
        assert_eq!(stats.total_images, 2);
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.total_videos, 1);
        assert_eq!(stats.total_audio, 0);
    }

    #[test]
    fn test_images_by_category_counts() {
        let db = create_test_db();
        let a = add_image(&db, "A", None);
        let b = add_image(&db, "B", None);
        add_image(&db, "C", None);

        let products = library::create_category(&db, "Products").unwrap();
        let banners = library::create_category(&db, "Banners").unwrap();
        library::assign_category(&db, MediaType::Image, a, products).unwrap();
        library::assign_category(&db, MediaType::Image, b, products).unwrap();
        library::assign_category(&db, MediaType::Image, b, banners).unwrap();

        let stats = stats::library_stats(&db).unwrap();
        assert_eq!(stats.total_categories, 2);

        let by_name: Vec<(&str, i64)> = stats
            .images_by_category
            .iter()
            .map(|c| (c.name.as_str(), c.image_count))
            .collect();
        assert_eq!(by_name, vec![("Banners", 1), ("Products", 2)]);
    }

    #[test]
    fn test_recent_uploads_are_capped_at_five() {
        let db = create_test_db();
        for i in 0..7 {
            let id = add_image(&db, &format!("Image {}", i), None);
            set_created_at(
                &db,
                "images",
                id,
                Some(&format!("2024-01-0{} 00:00:00", i + 1)),
            );
        }

        let stats = stats::library_stats(&db).unwrap();
        assert_eq!(stats.recent_uploads.images.len(), 5);
        assert_eq!(stats.recent_uploads.images[0].title, "Image 6");
        assert!(stats.recent_uploads.documents.is_empty());
    }
}

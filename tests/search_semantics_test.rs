use relatedcontactingroup::filtering::{Page, SortSpec};
use relatedcontactingroup::input::FilterInput;
use relatedcontactingroup::lookups::LookupProvider;
use relatedcontactingroup::schema::OutputColumn;
use relatedcontactingroup::{
    ContactSearch, DatabaseLookups, EmptyRelatedGroupPolicy, SearchError, SearchSettings,
};
use sea_orm::sea_query::Order;
use serde_json::json;
use std::collections::BTreeSet;

mod common;
use common::*;

async fn search_with(settings: SearchSettings) -> ContactSearch {
    let db = setup_test_db()
        .await
        .expect("Failed to setup test database");
    ContactSearch::new(db, settings)
}

async fn search() -> ContactSearch {
    search_with(SearchSettings::default()).await
}

fn input(values: serde_json::Value, settings: &SearchSettings) -> FilterInput {
    FilterInput::from_form_values(&form(values), settings).expect("valid form values")
}

/// Matching contact ids, unordered.
async fn matching(search: &ContactSearch, input: &FilterInput) -> BTreeSet<i64> {
    search
        .contact_ids(input, Page::UNPAGINATED, &SortSpec::default(), false)
        .await
        .expect("search succeeds")
        .into_iter()
        .collect()
}

fn ids(ids: &[i64]) -> BTreeSet<i64> {
    ids.iter().copied().collect()
}

#[tokio::test]
async fn test_including_related_contacts() {
    let search = search().await;
    let input = FilterInput::from_form_values(&members_related_to_board("in"), search.settings())
        .unwrap();

    // Ivan is deleted, Mallory's membership was removed, Dave and Niaj
    // are not related to an active board member
    assert_eq!(
        matching(&search, &input).await,
        ids(&[ALICE, BOB, CAROL, HEIDI, JUDY])
    );
}

#[tokio::test]
async fn test_excluding_related_contacts() {
    let search = search().await;
    let input =
        FilterInput::from_form_values(&members_related_to_board("not in"), search.settings())
            .unwrap();

    assert_eq!(matching(&search, &input).await, ids(&[DAVE, NIAJ]));
}

#[tokio::test]
async fn test_including_and_excluding_partition_the_group() {
    let search = search().await;
    let settings = search.settings().clone();
    let included = matching(
        &search,
        &FilterInput::from_form_values(&members_related_to_board("in"), &settings).unwrap(),
    )
    .await;
    let excluded = matching(
        &search,
        &FilterInput::from_form_values(&members_related_to_board("not in"), &settings).unwrap(),
    )
    .await;

    assert!(included.is_disjoint(&excluded));
    let all: BTreeSet<i64> = included.union(&excluded).copied().collect();
    assert_eq!(all, ids(&[ALICE, BOB, CAROL, DAVE, HEIDI, JUDY, NIAJ]));
}

#[tokio::test]
async fn test_relationship_direction_is_ignored() {
    let search = search().await;
    // Board members are contact B (Eve) and contact A (Frank) of their
    // relationships with members
    let input = input(
        json!({
            "group_id": [BOARD.to_string()],
            "related_group_id": [MEMBERS.to_string()],
            "including_excluding": "in",
        }),
        search.settings(),
    );

    assert_eq!(matching(&search, &input).await, ids(&[EVE, FRANK]));
}

#[tokio::test]
async fn test_relationship_type_filter() {
    let search = search().await;
    let mut values = members_related_to_board("in");

    values.insert("relationship_type_id".into(), json!([EMPLOYEE_OF.to_string()]));
    let employees = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &employees).await, ids(&[ALICE, JUDY]));

    values.insert(
        "relationship_type_id".into(),
        json!([SPOUSE_OF.to_string(), CHILD_OF.to_string()]),
    );
    let family = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &family).await, ids(&[BOB, CAROL, HEIDI]));
}

#[tokio::test]
async fn test_deceased_filter() {
    let search = search().await;
    let mut values = members_related_to_board("in");

    values.insert("is_deceased".into(), json!("0"));
    let living = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &living).await, ids(&[ALICE, BOB, CAROL, JUDY]));

    values.insert("is_deceased".into(), json!("1"));
    let deceased = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &deceased).await, ids(&[HEIDI]));

    values.insert("is_deceased".into(), json!(""));
    let any = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &any).await.len(), 5);
}

#[tokio::test]
async fn test_privacy_toggle() {
    let search = search().await;
    let mut values = members_related_to_board("in");
    values.insert("privacy_options".into(), json!(["do_not_email"]));

    values.insert("privacy_toggle".into(), json!("2"));
    let include = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &include).await, ids(&[JUDY]));

    values.insert("privacy_toggle".into(), json!("1"));
    let exclude = FilterInput::from_form_values(&values, search.settings()).unwrap();
    assert_eq!(matching(&search, &exclude).await, ids(&[ALICE, BOB, CAROL, HEIDI]));
}

#[tokio::test]
async fn test_active_relationships_only() {
    let search = search_with(SearchSettings {
        active_relationships_only: true,
        ..SearchSettings::default()
    })
    .await;
    let input = FilterInput::from_form_values(&members_related_to_board("in"), search.settings())
        .unwrap();

    // Carol's relationship with Frank is inactive
    assert_eq!(matching(&search, &input).await, ids(&[ALICE, BOB, HEIDI, JUDY]));
}

#[tokio::test]
async fn test_empty_related_group_rejected_by_default() {
    let search = search().await;
    let err = FilterInput::from_form_values(
        &form(json!({"group_id": ["10"], "related_group_id": ["", "0"]})),
        search.settings(),
    )
    .unwrap_err();

    match err {
        SearchError::ValidationFailed { errors } => {
            assert!(errors.has_field("related_group_id"));
            assert!(!errors.has_field("group_id"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_related_group_match_none() {
    let settings = SearchSettings {
        empty_related_group: EmptyRelatedGroupPolicy::MatchNone,
        ..SearchSettings::default()
    };
    let search = search_with(settings.clone()).await;

    let including = input(
        json!({"group_id": ["10"], "including_excluding": "in"}),
        &settings,
    );
    assert!(matching(&search, &including).await.is_empty());

    let excluding = input(
        json!({"group_id": ["10"], "including_excluding": "not in"}),
        &settings,
    );
    assert_eq!(
        matching(&search, &excluding).await,
        ids(&[ALICE, BOB, CAROL, DAVE, HEIDI, JUDY, NIAJ])
    );
}

#[tokio::test]
async fn test_selected_contacts_narrow_results() {
    let search = search().await;
    let mut values = members_related_to_board("in");
    values.insert(format!("mark_x_{ALICE}"), json!(1));
    values.insert(format!("mark_x_{DAVE}"), json!(1));
    let input = FilterInput::from_form_values(&values, search.settings()).unwrap();

    let selected: BTreeSet<i64> = search
        .contact_ids(&input, Page::UNPAGINATED, &SortSpec::default(), true)
        .await
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(selected, ids(&[ALICE]));

    assert_eq!(search.count(&input, true).await.unwrap(), 1);
    assert_eq!(search.count(&input, false).await.unwrap(), 5);
}

#[tokio::test]
async fn test_rows_sorted_and_paged() {
    let search = search().await;
    let input = FilterInput::from_form_values(&members_related_to_board("in"), search.settings())
        .unwrap();

    let rows = search
        .rows(&input, Page::new(1, 2), &SortSpec::default(), false)
        .await
        .unwrap();
    let page: Vec<i64> = rows.iter().map(|row| row.contact_id).collect();
    assert_eq!(page, [BOB, CAROL]);

    let by_id_desc = search
        .contact_ids(
            &input,
            Page::UNPAGINATED,
            &SortSpec::new(OutputColumn::ContactId, Order::Desc),
            false,
        )
        .await
        .unwrap();
    assert_eq!(by_id_desc, [JUDY, HEIDI, CAROL, BOB, ALICE]);
}

#[tokio::test]
async fn test_offset_beyond_signed_range_returns_no_rows() {
    let search = search().await;
    let input = FilterInput::from_form_values(&members_related_to_board("in"), search.settings())
        .unwrap();

    let rows = search
        .rows(&input, Page::new(9_223_372_036_854_775_808, 25), &SortSpec::default(), false)
        .await
        .unwrap();
    assert!(rows.is_empty());

    let ids = search
        .contact_ids(&input, Page::new(u64::MAX, u64::MAX), &SortSpec::default(), false)
        .await
        .unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_rows_carry_primary_address() {
    let search = search().await;
    let input = FilterInput::from_form_values(&members_related_to_board("in"), search.settings())
        .unwrap();

    let rows = search
        .rows(&input, Page::UNPAGINATED, &SortSpec::default(), false)
        .await
        .unwrap();

    let alice = rows.iter().find(|row| row.contact_id == ALICE).unwrap();
    assert_eq!(alice.sort_name.as_deref(), Some("Anderson, Alice"));
    assert_eq!(alice.contact_type.as_deref(), Some("Individual"));
    assert_eq!(alice.street_address.as_deref(), Some("1 Main St"));
    assert_eq!(alice.postal_code.as_deref(), Some("1000"));
    assert_eq!(alice.city.as_deref(), Some("Springfield"));

    let bob = rows.iter().find(|row| row.contact_id == BOB).unwrap();
    assert_eq!(bob.street_address, None);
    assert_eq!(bob.city, None);
}

#[tokio::test]
async fn test_count_matches_unpaginated_rows() {
    let search = search().await;
    // Alice is in both selected groups and must appear once
    let input = input(
        json!({
            "group_id": [MEMBERS.to_string(), VOLUNTEERS.to_string()],
            "related_group_id": [BOARD.to_string()],
            "including_excluding": "in",
        }),
        search.settings(),
    );

    let rows = search
        .rows(&input, Page::UNPAGINATED, &SortSpec::default(), false)
        .await
        .unwrap();
    let total = search.count(&input, false).await.unwrap();

    assert_eq!(total, 5);
    assert_eq!(rows.len() as u64, total);
    assert_eq!(rows.iter().filter(|row| row.contact_id == ALICE).count(), 1);
}

#[tokio::test]
async fn test_group_order_does_not_change_results() {
    let search = search().await;
    let forward = input(
        json!({"group_id": ["10", "30"], "related_group_id": ["20"], "including_excluding": "in"}),
        search.settings(),
    );
    let reversed = input(
        json!({"group_id": ["30", "10"], "related_group_id": ["20"], "including_excluding": "in"}),
        search.settings(),
    );

    assert_eq!(forward, reversed);
    assert_eq!(matching(&search, &forward).await, matching(&search, &reversed).await);
}

#[tokio::test]
async fn test_malformed_ids_never_reach_the_database() {
    let search = search().await;
    let err = FilterInput::from_form_values(
        &form(json!({"group_id": ["10) OR (1=1"], "related_group_id": ["20"]})),
        search.settings(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        SearchError::MalformedReference { ref field, .. } if field == "group_id"
    ));
}

#[tokio::test]
async fn test_database_lookups() {
    let db = setup_test_db()
        .await
        .expect("Failed to setup test database");
    let lookups = DatabaseLookups::new(db);

    let groups: Vec<(i64, String)> = lookups
        .groups()
        .await
        .unwrap()
        .into_iter()
        .map(|option| (option.id, option.label))
        .collect();
    assert_eq!(
        groups,
        [
            (BOARD, "Board".to_string()),
            (MEMBERS, "Members".to_string()),
            (VOLUNTEERS, "Volunteers".to_string()),
        ]
    );
    assert!(!groups.iter().any(|(id, _)| *id == ARCHIVE));

    let types: Vec<String> = lookups
        .relationship_types()
        .await
        .unwrap()
        .into_iter()
        .map(|option| option.label)
        .collect();
    assert_eq!(types, ["Employee of", "Spouse of", "Child of"]);
}

#[tokio::test]
async fn test_database_failure_is_sanitized() {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    let search = ContactSearch::new(db, SearchSettings::default());
    let input = FilterInput::from_form_values(&members_related_to_board("in"), search.settings())
        .unwrap();

    let err = search.count(&input, false).await.unwrap_err();
    assert!(matches!(err, SearchError::Database { .. }));
    assert_eq!(err.user_message(), "A database error occurred");
}

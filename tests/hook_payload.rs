use serde_json::{Value, json};
use upload_normalizer::pipeline::HookPayload;

fn run(payload: Value) -> Value {
    let payload: HookPayload = serde_json::from_value(payload).unwrap();
    serde_json::to_value(payload.normalize()).unwrap()
}

fn with_metadata(image_metadata: Value) -> Value {
    run(json!({
        "resource_info": { "image_metadata": image_metadata },
        "upload_options": {}
    }))
}

#[test]
fn keywords_and_subject_merge_into_ordered_list() {
    let out = with_metadata(json!({ "Keywords": "a,b,c", "Subject": "b,c,d" }));
    assert_eq!(out["tags"], json!(["a", "b", "c", "d"]));
}

#[test]
fn keywords_alone_stay_a_raw_string() {
    let out = with_metadata(json!({ "Keywords": "a,b,c" }));
    assert_eq!(out["tags"], json!("a,b,c"));
}

#[test]
fn subject_alone_stays_a_raw_string() {
    let out = with_metadata(json!({ "Subject": "b,c,d", "Keywords": null }));
    assert_eq!(out["tags"], json!("b,c,d"));
}

#[test]
fn no_tag_sources_leave_tags_unset() {
    let out = with_metadata(json!({ "Description": "x" }));
    assert!(out.get("tags").is_none());
}

#[test]
fn description_becomes_alt_context() {
    let out = with_metadata(json!({ "Description": "A cat" }));
    assert_eq!(out["context"], json!("alt=A cat"));
}

#[test]
fn null_rights_field_is_dropped_without_double_pipe() {
    let out = with_metadata(json!({
        "CopyrightNotice": "Co",
        "Artist": null,
        "ImageCreatorName": "Author"
    }));
    assert_eq!(out["metadata"], json!("copyright_notice=Co|author=Author"));
}

#[test]
fn all_rights_fields_null_give_empty_metadata() {
    let out = with_metadata(json!({
        "CopyrightNotice": null,
        "Artist": null,
        "ImageCreatorName": null
    }));
    assert_eq!(out["metadata"], json!(""));
}

#[test]
fn unique_filename_is_always_false() {
    for upload_options in [json!({}), json!({ "unique_filename": true })] {
        let out = run(json!({
            "resource_info": { "image_metadata": { "Keywords": "k" } },
            "upload_options": upload_options
        }));
        assert_eq!(out["unique_filename"], json!(false));
    }
}

#[test]
fn missing_image_metadata_is_not_an_error() {
    let out = run(json!({
        "resource_info": {},
        "upload_options": { "folder": "assets", "access_mode": "public" }
    }));
    assert_eq!(
        out,
        json!({
            "unique_filename": false,
            "metadata": "",
            "folder": "assets",
            "access_mode": "public"
        })
    );
}

#[test]
fn null_image_metadata_is_not_an_error() {
    let out = run(json!({ "resource_info": { "image_metadata": null } }));
    assert_eq!(out, json!({ "unique_filename": false, "metadata": "" }));
}

#[test]
fn empty_strings_are_not_errors() {
    let out = with_metadata(json!({
        "Keywords": "",
        "Subject": "",
        "Description": "",
        "CopyrightNotice": "",
        "Artist": "",
        "ImageCreatorName": ""
    }));
    assert!(out.get("tags").is_none());
    assert!(out.get("context").is_none());
    assert_eq!(out["metadata"], json!("copyright_notice=|artist=|author="));
}

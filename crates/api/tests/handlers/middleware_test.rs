use axum::http::{Request, StatusCode};
use carebook_api::middleware::{
    auth::{Caller, Role},
    error_handling::map_error,
};
use carebook_core::errors::CareError;
use rstest::rstest;
use uuid::Uuid;

#[rstest]
#[case(CareError::NotFound("Doctor not found".into()), StatusCode::NOT_FOUND)]
#[case(CareError::InvalidInput("Bad window".into()), StatusCode::BAD_REQUEST)]
#[case(CareError::SlotConflict("Taken".into()), StatusCode::CONFLICT)]
#[case(CareError::Unauthorized("Not yours".into()), StatusCode::FORBIDDEN)]
#[case(CareError::TooLate("Cutoff passed".into()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(CareError::InvalidState("Already cancelled".into()), StatusCode::CONFLICT)]
#[case(CareError::Authentication("Missing header".into()), StatusCode::UNAUTHORIZED)]
#[case(CareError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: CareError, #[case] status: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), status);
}

fn parts(headers: &[(&str, &str)]) -> axum::http::request::Parts {
    let mut builder = Request::builder().uri("/api/appointments");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn test_caller_from_headers() {
    let user_id = Uuid::new_v4();
    let id = user_id.to_string();

    let caller = Caller::from_parts(&parts(&[("x-user-id", &id), ("x-user-role", "Admin")])).unwrap();
    assert_eq!(caller, Caller { user_id, role: Role::Admin });

    let caller = Caller::from_parts(&parts(&[("x-user-id", &id), ("x-user-role", "patient")])).unwrap();
    assert_eq!(caller.role, Role::Patient);
}

#[rstest]
#[case::no_headers(&[])]
#[case::no_role(&[("x-user-id", "1b4e28ba-2fa1-11d2-883f-0016d3cca427")])]
#[case::bad_id(&[("x-user-id", "42"), ("x-user-role", "patient")])]
#[case::bad_role(&[("x-user-id", "1b4e28ba-2fa1-11d2-883f-0016d3cca427"), ("x-user-role", "doctor")])]
fn test_caller_rejections(#[case] headers: &[(&str, &str)]) {
    let result = Caller::from_parts(&parts(headers));
    assert!(matches!(result, Err(CareError::Authentication(_))));
}

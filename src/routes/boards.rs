use crate::{
    error::AppError,
    store::{boards_for_user, RecordStore},
};
use actix_web::{get, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists the boards a user belongs to.
///
/// ## Path Parameters:
/// - `user_id`: UUID of the user.
///
/// ## Responses:
/// - `200 OK`: JSON array of boards, empty when the user has none.
/// - `500 Internal Server Error`: the record store failed, or `user_id` is not a UUID.
#[get("/boards/{user_id}")]
pub async fn list_user_boards(
    store: web::Data<dyn RecordStore>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let boards = boards_for_user(store.get_ref(), user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(boards))
}

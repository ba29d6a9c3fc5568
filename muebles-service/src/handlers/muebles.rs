//! Furniture CRUD handlers
//!
//! Every handler runs its store work inside [`with_collection`], so the store
//! handle is acquired per request and released on every exit path. Input is
//! validated before the handle is acquired.

use axum::extract::{Query, State};
use tracing::instrument;

use crate::allocator::next_code;
use crate::envelope::with_collection;
use crate::error::{Error, Result};
use crate::middleware::NumericFields;
use crate::model::{Mueble, FIELD_CODE};
use crate::query::ListQuery;
use crate::responses::{Created, Success, MSG_CREATED, MSG_DELETED, MSG_UPDATED};
use crate::routes::MUEBLES_PATH;
use crate::state::AppState;
use crate::store::{Document, Filter, StoreOperation};

/// `GET /api/v1/muebles`
///
/// Reads the query string as raw pairs so repeated keys never reject the
/// request.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Success<Vec<Document>>> {
    let plan = ListQuery::from_pairs(params).plan();
    tracing::debug!(
        strategy = ?plan.strategy,
        filter = %plan.filter,
        sort = ?plan.options.sort.as_ref().map(ToString::to_string),
        "Listing muebles"
    );

    let muebles = with_collection(state.store(), state.collection(), move |coll| {
        Box::pin(async move {
            let found = coll.find(&plan.filter, plan.options).await?;
            Ok::<_, Error>(found)
        })
    })
    .await?;

    Ok(Success::new(muebles))
}

/// `GET /api/v1/muebles/{codigo}`
#[instrument(skip(state))]
pub async fn get(State(state): State<AppState>, input: NumericFields) -> Result<Success<Document>> {
    let codigo = input.codigo();

    let mueble = with_collection(state.store(), state.collection(), move |coll| {
        Box::pin(async move {
            let found = match codigo {
                Some(codigo) => coll.find_one(&Filter::eq(FIELD_CODE, codigo)).await?,
                None => None,
            };
            found.ok_or(Error::not_found(codigo))
        })
    })
    .await?;

    Ok(Success::new(mueble))
}

/// `POST /api/v1/muebles`
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>, input: NumericFields) -> Result<Created<Mueble>> {
    let draft = input.draft()?;

    let mueble = with_collection(state.store(), state.collection(), move |coll| {
        Box::pin(async move {
            let mueble = Mueble {
                codigo: next_code(coll).await?,
                nombre: draft.nombre,
                precio: draft.precio,
                categoria: draft.categoria,
            };
            coll.insert_one(mueble.to_document(StoreOperation::InsertOne)?)
                .await?;
            Ok::<_, Error>(mueble)
        })
    })
    .await?;

    tracing::info!(codigo = mueble.codigo, "Mueble created");
    let location = format!("{}/{}", MUEBLES_PATH, mueble.codigo);
    Ok(Created::new(MSG_CREATED, mueble).with_location(location))
}

/// `PUT /api/v1/muebles/{codigo}`
///
/// Replaces every field except `codigo`, which comes from the path.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, input: NumericFields) -> Result<Success<Mueble>> {
    let draft = input.draft()?.require_positive_price()?;
    let codigo = input.codigo();

    let mueble = with_collection(state.store(), state.collection(), move |coll| {
        Box::pin(async move {
            let Some(codigo) = codigo else {
                return Err(Error::not_found(None));
            };
            let filter = Filter::eq(FIELD_CODE, codigo);
            if coll.find_one(&filter).await?.is_none() {
                return Err(Error::not_found(Some(codigo)));
            }

            let mueble = Mueble {
                codigo,
                nombre: draft.nombre,
                precio: draft.precio,
                categoria: draft.categoria,
            };
            coll.update_one(&filter, mueble.to_document(StoreOperation::UpdateOne)?)
                .await?;
            Ok::<_, Error>(mueble)
        })
    })
    .await?;

    tracing::info!(codigo = mueble.codigo, "Mueble updated");
    Ok(Success::new(mueble).with_message(MSG_UPDATED))
}

/// `DELETE /api/v1/muebles/{codigo}`
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, input: NumericFields) -> Result<Success<()>> {
    let codigo = input.codigo();

    let deleted = with_collection(state.store(), state.collection(), move |coll| {
        Box::pin(async move {
            let Some(codigo) = codigo else {
                return Err(Error::not_found(None));
            };
            let filter = Filter::eq(FIELD_CODE, codigo);
            if coll.find_one(&filter).await?.is_none() {
                return Err(Error::not_found(Some(codigo)));
            }
            coll.delete_one(&filter).await?;
            Ok::<_, Error>(codigo)
        })
    })
    .await?;

    tracing::info!(codigo = deleted, "Mueble deleted");
    Ok(Success::message(MSG_DELETED))
}

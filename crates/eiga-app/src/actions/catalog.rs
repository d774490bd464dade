//! Catalog loader tasks

use std::sync::Arc;

use tokio::sync::mpsc;

use eiga_catalog::{fetch_movies_in_order, CatalogApi};
use eiga_core::prelude::*;
use eiga_core::MovieId;

use crate::message::{GenreRequest, Message};

pub(super) fn spawn_fetch_popular<C>(catalog: Arc<C>, msg_tx: mpsc::Sender<Message>)
where
    C: CatalogApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match catalog.popular(1).await {
            Ok(page) => Message::PopularLoaded(page),
            Err(e) => Message::PopularFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_fetch_genre<C>(
    catalog: Arc<C>,
    request: GenreRequest,
    msg_tx: mpsc::Sender<Message>,
) where
    C: CatalogApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!(
            "Fetching genre {} page {}",
            request.genre_id, request.page
        );
        let msg = match catalog
            .discover_by_genre(&request.genre_id, request.page)
            .await
        {
            Ok(page) => Message::GenreLoaded { request, page },
            Err(e) => Message::GenreFailed {
                request,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Fan out over `ids`; the message is sent only once every request settled
pub(super) fn spawn_fetch_famous<C>(
    catalog: Arc<C>,
    ids: Vec<MovieId>,
    msg_tx: mpsc::Sender<Message>,
) where
    C: CatalogApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match fetch_movies_in_order(catalog.as_ref(), &ids).await {
            Ok(movies) => Message::FamousLoaded(movies),
            Err(e) => Message::FamousFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

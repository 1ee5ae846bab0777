// Add/remove submissions for movie cards.
// Removal is optimistic: the card fades at once and is only detached after the server agrees.

use std::time::Duration;

use crate::api::{AddStatus, FavoriteForm, MovieApi};
use crate::error::UiError;
use crate::timers::Timers;
use crate::toast::ToastSink;
use crate::types::{MovieId, UiConfig};

pub const ADDED: &str = "Movie added to your list";
pub const ALREADY_LISTED: &str = "Already in your list";
pub const ADD_FAILED: &str = "Error adding movie";
pub const REMOVED: &str = "Movie removed!";
pub const REMOVE_FAILED: &str = "Error removing movie";

/// The card a remove form lives in.
pub trait CardSurface: Clone + 'static {
    fn fade_out(&self);
    /// Undo `fade_out`.
    fn restore(&self);
    fn detach(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added,
    AlreadyListed,
    Failed(UiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// Detach is scheduled after the fade.
    Removed,
    Failed(UiError),
}

pub struct FavoriteDispatcher<A, N, T> {
    api: A,
    toasts: N,
    timers: T,
    fade: Duration,
}

impl<A: MovieApi, N: ToastSink, T: Timers> FavoriteDispatcher<A, N, T> {
    pub fn new(api: A, toasts: N, timers: T, config: &UiConfig) -> Self {
        FavoriteDispatcher {
            api,
            toasts,
            timers,
            fade: config.fade_out(),
        }
    }

    pub async fn add(&self, form: &FavoriteForm) -> AddOutcome {
        match self.api.add_favorite(form).await {
            Ok(AddStatus::Added) => {
                self.toasts.info(ADDED);
                AddOutcome::Added
            }
            Ok(AddStatus::AlreadyListed) => {
                self.toasts.info(ALREADY_LISTED);
                AddOutcome::AlreadyListed
            }
            Err(err) => {
                crate::error_log!(
                    "Adding movie {} failed: {}",
                    form.get("id").unwrap_or("?"),
                    err
                );
                self.toasts.error(&err.user_message(ADD_FAILED));
                AddOutcome::Failed(err)
            }
        }
    }

    /// `raw_id` is the form's `id` field as submitted.
    pub async fn remove<C: CardSurface>(&self, card: &C, raw_id: &str) -> RemoveOutcome {
        card.fade_out();

        let result = match MovieId::parse(raw_id) {
            Ok(id) => self.api.remove_favorite(id).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                let card = card.clone();
                self.timers.after(self.fade, Box::new(move || card.detach()));
                self.toasts.info(REMOVED);
                RemoveOutcome::Removed
            }
            Err(err) => {
                crate::error_log!("Removing movie {:?} failed: {}", raw_id, err);
                card.restore();
                self.toasts.error(&err.user_message(REMOVE_FAILED));
                RemoveOutcome::Failed(err)
            }
        }
    }
}

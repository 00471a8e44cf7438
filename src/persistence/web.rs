//! Browser transport for the world document
//!
//! GET to load, PUT to save, both through `fetch`. Results are handed back
//! to the `Game` so the render loop never waits on the network.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Request, RequestInit, Response};

use super::PersistError;
use crate::game::Game;

fn js_error(value: JsValue) -> PersistError {
    PersistError::Transport(format!("{:?}", value))
}

async fn send(request: &Request) -> Result<Response, PersistError> {
    let window = web_sys::window().ok_or_else(|| PersistError::Transport("no window".into()))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    value.dyn_into::<Response>().map_err(js_error)
}

/// Fetch the world document text
pub async fn fetch_world(url: &str) -> Result<String, PersistError> {
    let request = Request::new_with_str(url).map_err(js_error)?;
    let response = send(&request).await?;
    if !response.ok() {
        return Err(PersistError::Status(response.status()));
    }
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| PersistError::Transport("response body is not text".into()))
}

/// Replace the world document on the server; returns the HTTP status
pub async fn put_world(url: &str, body: &str) -> Result<u16, PersistError> {
    let init = RequestInit::new();
    init.set_method("PUT");
    init.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let response = send(&request).await?;
    if response.ok() {
        Ok(response.status())
    } else {
        Err(PersistError::Status(response.status()))
    }
}

/// Start the one-time world load
pub fn spawn_load(game: Rc<RefCell<Game>>) {
    let url = game.borrow().settings.world_url.clone();
    spawn_local(async move {
        let result = fetch_world(&url).await;
        game.borrow_mut().finish_load(result);
    });
}

/// Send a save built by the world; completion feeds back into the queue
pub fn spawn_save(game: Rc<RefCell<Game>>, body: String) {
    let url = game.borrow().settings.world_url.clone();
    spawn_local(async move {
        let result = put_world(&url, &body).await;
        game.borrow_mut().finish_save(result);
    });
}

//! Local save server (native only)
//!
//! Serves the page, its scripts, the wasm package and the world document
//! from one directory, and accepts `PUT /world.json` so the in-browser
//! editor can write the level back to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::consts::WORLD_PATH;
use crate::persistence::{PersistError, WorldDocument};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Serve the game and save edited levels")]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, default_value_t = 8888)]
    pub port: u16,
    /// Directory holding index.html, scripts and pkg/
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// World file name inside the root
    #[arg(long, default_value = "world.json")]
    pub world: String,
}

/// What a request resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Send a file relative to the root
    File {
        path: String,
        content_type: &'static str,
    },
    /// Replace the world document with the request body
    SaveWorld,
    NotFound,
}

/// A single path segment that is safe to join onto the root
fn plain_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains("..") && !name.contains('\\')
}

fn script_type(name: &str) -> Option<&'static str> {
    if name.ends_with(".mjs") || name.ends_with(".js") {
        Some("text/javascript")
    } else {
        None
    }
}

/// Resolve a request line against the served layout
pub fn route(method: &Method, url: &str, world_file: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    if path.contains("..") {
        return Route::NotFound;
    }

    match method {
        Method::Get => {
            if path == "/" {
                return Route::File {
                    path: "index.html".into(),
                    content_type: "text/html;charset=utf8",
                };
            }
            if path == WORLD_PATH {
                return Route::File {
                    path: world_file.into(),
                    content_type: "application/json",
                };
            }

            let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
            match segments.as_slice() {
                [name] if plain_name(name) => match script_type(name) {
                    Some(content_type) => Route::File {
                        path: name.to_string(),
                        content_type,
                    },
                    None => Route::NotFound,
                },
                ["pkg", name] if plain_name(name) => {
                    let content_type = if name.ends_with(".wasm") {
                        Some("application/wasm")
                    } else {
                        script_type(name)
                    };
                    match content_type {
                        Some(content_type) => Route::File {
                            path: format!("pkg/{}", name),
                            content_type,
                        },
                        None => Route::NotFound,
                    }
                }
                _ => Route::NotFound,
            }
        }
        Method::Put if path == WORLD_PATH => Route::SaveWorld,
        _ => Route::NotFound,
    }
}

/// Write `bytes` next to `name`, then rename over it
pub fn write_atomically(dir: &Path, name: &str, bytes: &[u8]) -> io::Result<()> {
    let temp = dir.join(format!("{}.temp", name));
    fs::write(&temp, bytes)?;
    fs::rename(&temp, dir.join(name))
}

/// Validate and store a PUT body; returns the status to answer with
pub fn save_world(config: &ServerConfig, body: &str) -> u16 {
    if let Err(e) = WorldDocument::from_json(body) {
        log::warn!("Rejected world upload: {}", e);
        return 400;
    }
    match write_atomically(&config.root, &config.world, body.as_bytes()) {
        Ok(()) => {
            log::info!("Wrote {}", config.world);
            200
        }
        Err(e) => {
            log::error!("Writing {}: {}", config.world, e);
            500
        }
    }
}

fn content_type(value: &str) -> Option<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).ok()
}

fn handle(config: &ServerConfig, mut request: Request) -> io::Result<()> {
    let route = route(request.method(), request.url(), &config.world);
    log::info!("{} {} -> {:?}", request.method(), request.url(), route);

    match route {
        Route::File { path, content_type: ct } => match fs::read(config.root.join(&path)) {
            Ok(data) => {
                let mut response = Response::from_data(data);
                if let Some(header) = content_type(ct) {
                    response = response.with_header(header);
                }
                request.respond(response)
            }
            Err(e) => {
                log::error!("Opening '{}': {}", path, e);
                request.respond(Response::empty(500))
            }
        },
        Route::SaveWorld => {
            let mut body = String::new();
            let status = match request.as_reader().read_to_string(&mut body) {
                Ok(_) => save_world(config, &body),
                Err(e) => {
                    log::error!("Reading upload: {}", e);
                    500
                }
            };
            request.respond(Response::empty(status))
        }
        Route::NotFound => request.respond(Response::empty(404)),
    }
}

/// Serve until the process is stopped
pub fn run(config: &ServerConfig) -> Result<(), PersistError> {
    let addr = format!("0.0.0.0:{}", config.port);
    let server = Server::http(&addr).map_err(|e| io::Error::other(e.to_string()))?;
    log::info!("Listening (via http) on port {}, serving {}", config.port, config.root.display());

    for request in server.incoming_requests() {
        if let Err(e) = handle(config, request) {
            log::error!("Responding: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plankton-server-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(root: PathBuf) -> ServerConfig {
        ServerConfig {
            port: 0,
            root,
            world: "world.json".into(),
        }
    }

    #[test]
    fn test_routes() {
        let get = |url| route(&Method::Get, url, "world.json");
        assert_eq!(
            get("/"),
            Route::File { path: "index.html".into(), content_type: "text/html;charset=utf8" }
        );
        assert_eq!(
            get("/world.json?t=1"),
            Route::File { path: "world.json".into(), content_type: "application/json" }
        );
        assert_eq!(
            get("/game.mjs"),
            Route::File { path: "game.mjs".into(), content_type: "text/javascript" }
        );
        assert_eq!(
            get("/pkg/plankton_bg.wasm"),
            Route::File { path: "pkg/plankton_bg.wasm".into(), content_type: "application/wasm" }
        );
        assert_eq!(get("/secret.txt"), Route::NotFound);
        assert_eq!(get("/.hidden.js"), Route::NotFound);
        assert_eq!(get("/pkg/../../etc/passwd.js"), Route::NotFound);
        assert_eq!(get("/a/b/c.js"), Route::NotFound);

        assert_eq!(route(&Method::Put, "/world.json", "world.json"), Route::SaveWorld);
        assert_eq!(route(&Method::Put, "/game.mjs", "world.json"), Route::NotFound);
        assert_eq!(route(&Method::Delete, "/world.json", "world.json"), Route::NotFound);
    }

    #[test]
    fn test_write_atomically_replaces() {
        let dir = temp_root("atomic");
        fs::write(dir.join("world.json"), "old").unwrap();
        write_atomically(&dir, "world.json", b"new").unwrap();
        assert_eq!(fs::read_to_string(dir.join("world.json")).unwrap(), "new");
        assert!(!dir.join("world.json.temp").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_world_validates() {
        let dir = temp_root("save");
        let config = config(dir.clone());

        assert_eq!(save_world(&config, "{\"blocks\": 3}"), 400);
        assert!(!dir.join("world.json").exists());

        let body = r#"{"blocks":[{"mode":0,"at":[0,0],"angle":0,"radii":[1,1],"round":0,"seed":0}]}"#;
        assert_eq!(save_world(&config, body), 200);
        assert_eq!(fs::read_to_string(dir.join("world.json")).unwrap(), body);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_world_io_failure() {
        let dir = temp_root("missing");
        let config = config(dir.join("does-not-exist"));
        let body = r#"{"blocks":[]}"#;
        assert_eq!(save_world(&config, body), 500);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cli_defaults() {
        let config = ServerConfig::parse_from(["plankton"]);
        assert_eq!(config.port, 8888);
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.world, "world.json");
    }
}

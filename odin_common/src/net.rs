/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! common utility functions for (blocking) network operations
//! these are used by tools that process one request at a time and have to respect provider rate limits

use std::time::Duration;
use reqwest::{blocking::{Client,Response}, header::{HeaderValue,ACCEPT}, StatusCode};
use serde::{de::DeserializeOwned,Serialize};

use crate::define_error;

define_error!{ pub OdinNetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    StatusError(StatusCode) : "response status {0}",
    ParseError(String) : "parse error: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub type Result<T> = std::result::Result<T, OdinNetError>;

/// create a blocking client. Note that some public services (e.g. OSM Nominatim) reject requests without a
/// proper user agent
pub fn blocking_client (user_agent: Option<&str>, timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent.to_string());
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok( builder.build()? )
}

/// HTTP GET of a JSON resource with the provided query parameters. Anything but a 2xx response status
/// is reported as `StatusError`, a body that does not deserialize into `T` as `ParseError`
pub fn get_json<T,Q> (client: &Client, url: &str, query: &Q) -> Result<T> where T: DeserializeOwned, Q: Serialize + ?Sized {
    let response = client.get(url)
        .header( ACCEPT, HeaderValue::from_static("application/json"))
        .query(query)
        .send()?;

    let response = check_status(response)?;
    let bytes = response.bytes()?;
    serde_json::from_slice( &bytes).map_err(|e| OdinNetError::ParseError(e.to_string()))
}

/// HTTP GET of a full URL, returning the response body only if the status is 200 (OK)
pub fn get_bytes (client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send()?;

    match response.status() {
        StatusCode::OK => Ok( response.bytes()?.to_vec() ),
        other => Err( OdinNetError::StatusError(other) )
    }
}

fn check_status (response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err( OdinNetError::StatusError(status))
    }
}

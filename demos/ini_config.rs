// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use logforth_ini::LoggerConfig;

fn main() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/log.ini");
    let config = match LoggerConfig::read_file(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    logforth_ini::set_config(config).unwrap();
    logforth_ini::bridge::setup_log_crate();

    logforth_ini::info!("demo started with {} workers", 4);
    logforth_ini::debug_str!("only in the rotating file");
    logforth_ini::warn!("queue depth {} is above the limit", 128);
    logforth_ini::error!("request {} failed", "GET /");
    log::info!("records from the log crate share the same sinks");

    logforth_ini::flush();
}

// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod benchmark;
pub mod chart;
pub mod commentary;
pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod period;
pub mod ratios;
pub mod report;
pub mod repository;
pub mod scoring;
pub mod series;
pub mod session;
pub mod web;

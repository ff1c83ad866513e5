// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every flag can also be set through the environment (or a `.env` file
//! loaded by the binary before parsing).

use clap::{Args, Parser};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

use crate::classifier::DEFAULT_INTRA_THREADS;
use crate::vision::IMG_SIZE;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MODEL_PATH: &str = "./models/model.onnx";
pub const DEFAULT_CLASS_INDICES_PATH: &str = "./models/class_indices.json";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Port must be greater than 0")]
    ZeroPort,

    #[error("Image size must be greater than 0")]
    ZeroImageSize,

    #[error("Intra-op thread count must be greater than 0")]
    ZeroThreads,

    #[error("Upload limit must be greater than 0")]
    ZeroUploadLimit,
}

/// Model artifacts produced by training
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ModelPaths {
    /// ONNX export of the gesture CNN
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// JSON map of label -> class index
    #[arg(long, env = "CLASS_INDICES_PATH", default_value = DEFAULT_CLASS_INDICES_PATH)]
    pub class_indices_path: PathBuf,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = DEFAULT_INTRA_THREADS)]
    pub intra_threads: usize,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            class_indices_path: PathBuf::from(DEFAULT_CLASS_INDICES_PATH),
            intra_threads: DEFAULT_INTRA_THREADS,
        }
    }
}

/// Sign gesture prediction server
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "sign-gesture-node")]
#[command(about = "HTTP service classifying hand-sign gesture photos", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: IpAddr,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[command(flatten)]
    pub model: ModelPaths,

    /// Side length the model was trained on
    #[arg(long, env = "IMG_SIZE", default_value_t = IMG_SIZE)]
    pub img_size: u32,

    /// Write debug_input.jpg / debug_thresh.jpg here for every request
    #[arg(long, env = "DEBUG_DUMP_DIR")]
    pub debug_dump_dir: Option<PathBuf>,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            model: ModelPaths::default(),
            img_size: IMG_SIZE,
            debug_dump_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.img_size == 0 {
            return Err(ConfigError::ZeroImageSize);
        }
        if self.model.intra_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

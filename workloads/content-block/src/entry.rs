//! Browser entry point.

use std::rc::Rc;

use block_sdk::prelude::*;
use wasm_bindgen::prelude::*;

use crate::settings::page_config;

/// Mount the block once the document is ready.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let boot_logger = StructuredLogger::new(Rc::new(ConsoleSink)).with_component("content-block");
    let dom = match BrowserDom::new() {
        Ok(dom) => dom,
        Err(e) => {
            boot_logger.error_with("No document to mount into", &[("error", &e)]);
            return;
        }
    };

    let ready = dom.clone();
    let result = dom.on_ready(Box::new(move || {
        wasm_bindgen_futures::spawn_local(mount(ready));
    }));
    if let Err(e) = result {
        boot_logger.error_with("Failed to wait for the document", &[("error", &e)]);
    }
}

async fn mount(dom: BrowserDom) {
    let boot_logger = StructuredLogger::new(Rc::new(ConsoleSink));
    let config = page_config(&dom, &boot_logger);
    let logger = StructuredLogger::from_config(&config.logging, Rc::new(ConsoleSink))
        .with_component("content-block");

    let source = Rc::new(
        MockContentSource::with_default_catalog().with_latency(config.content.latency()),
    );

    let outcome = BlockMount::new(dom, source, config, logger.clone()).run().await;
    if let MountOutcome::Rendered { block_id, origin } = outcome {
        logger
            .with_block(&block_id)
            .debug_builder("Mount finished")
            .field("origin", origin.to_string())
            .emit();
    }
}

use serde::Deserialize;

/// Translation options. Field names deserialize from the camel-cased JSON
/// an options file uses.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Emit `[ … ]` array literals; `array( … )` when disabled.
    pub concise_arrays: bool,
    /// Namespace declaration prepended to the output.
    pub namespace: Option<String>,
    /// Comment text emitted right under the `<?php` opener.
    pub watermark: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            concise_arrays: true,
            namespace: None,
            watermark: None,
        }
    }
}

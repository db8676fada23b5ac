use std::io::Write;

use crate::enclose::Enclosure;
use crate::engine::Packer;
use crate::error::Result;
use crate::model::Placement;
use crate::packer::PackingAlgorithm;
use serde::Serialize;
use serde_json::{Value, json};

/// Serialize every opened bin as `{ bins: [{ id, width, height, rects }], meta }`.
/// `meta` carries the configuration and packing statistics.
pub fn to_json<K: Clone + Serialize>(packer: &Packer<K>) -> Value {
    let bins_val = packer
        .iter()
        .enumerate()
        .map(|(id, bin)| {
            let rects_val: Vec<Value> = bin
                .rectangles()
                .iter()
                .map(|r| {
                    json!({
                        "x": r.x,
                        "y": r.y,
                        "w": r.width,
                        "h": r.height,
                        "rid": &r.rid,
                    })
                })
                .collect();
            json!({
                "id": id,
                "width": bin.width(),
                "height": bin.height(),
                "rects": rects_val,
            })
        })
        .collect::<Vec<_>>();
    json!({
        "bins": bins_val,
        "meta": {
            "config": packer.config(),
            "stats": packer.stats(),
        }
    })
}

/// Flat list of placements, one object per rectangle.
pub fn placements_to_json<K: Serialize>(placements: &[Placement<K>]) -> Value {
    Value::Array(
        placements
            .iter()
            .map(|p| {
                json!({
                    "bin": p.bin,
                    "x": p.x,
                    "y": p.y,
                    "w": p.width,
                    "h": p.height,
                    "rid": &p.rid,
                })
            })
            .collect(),
    )
}

/// `{ width, height, area, rects }` for an enclosure; `rid` is the input index.
pub fn enclosure_to_json(enclosure: &Enclosure) -> Value {
    let rects = enclosure
        .placements
        .iter()
        .map(|p| json!({"x": p.x, "y": p.y, "w": p.width, "h": p.height, "rid": p.rid}))
        .collect::<Vec<_>>();
    json!({
        "width": enclosure.width,
        "height": enclosure.height,
        "area": enclosure.area(),
        "rects": rects,
    })
}

/// Pretty-print `value` to `writer`, followed by a newline.
pub fn write_json<W: Write>(value: &Value, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

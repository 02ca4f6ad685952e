//! Clean-up of rendered PDFs with `lopdf`.
//!
//! `genpdf` embeds every style slot of a font family as its own font program.  The report uses a
//! single face for all slots, so [`dedup_font_files`] keeps one copy of each distinct font program
//! and points every font descriptor at it.

use std::collections::BTreeMap;

use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

const FONT_FILE_KEYS: [&[u8]; 3] = [b"FontFile", b"FontFile2", b"FontFile3"];

/// Rewrites `pdf_bytes` so that identical embedded font programs are stored once.
///
/// Returns the input unchanged when there is nothing to merge.
pub fn dedup_font_files(pdf_bytes: &[u8]) -> Result<Vec<u8>, lopdf::Error> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let replacements = duplicate_font_files(&document);
    if replacements.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    for object in document.objects.values_mut() {
        redirect(object, &replacements);
    }
    for duplicate in replacements.keys() {
        document.objects.remove(duplicate);
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    debug!(
        "Merged {} duplicate font programs ({} -> {} bytes)",
        replacements.len(),
        pdf_bytes.len(),
        buffer.len()
    );
    Ok(buffer)
}

/// Object ids of the font programs referenced by font descriptors, in first-seen order.
pub fn font_file_ids(document: &Document) -> Vec<ObjectId> {
    let mut found = Vec::new();
    for object in document.objects.values() {
        collect_font_files(object, &mut found);
    }
    found
}

fn duplicate_font_files(document: &Document) -> BTreeMap<ObjectId, ObjectId> {
    let mut kept: Vec<ObjectId> = Vec::new();
    let mut replacements = BTreeMap::new();

    for id in font_file_ids(document) {
        let Some(Object::Stream(stream)) = document.objects.get(&id) else {
            continue;
        };
        let original = kept.iter().copied().find(|candidate| {
            matches!(
                document.objects.get(candidate),
                Some(Object::Stream(other)) if same_program(stream, other)
            )
        });
        match original {
            Some(original) => {
                replacements.insert(id, original);
            }
            None => kept.push(id),
        }
    }

    replacements
}

fn same_program(a: &Stream, b: &Stream) -> bool {
    a.content == b.content && filter(a) == filter(b)
}

fn filter(stream: &Stream) -> Option<&[u8]> {
    stream.dict.get(b"Filter").and_then(Object::as_name).ok()
}

fn collect_font_files(object: &Object, found: &mut Vec<ObjectId>) {
    match object {
        Object::Dictionary(dict) => collect_in_dict(dict, found),
        Object::Stream(stream) => collect_in_dict(&stream.dict, found),
        Object::Array(items) => {
            for item in items {
                collect_font_files(item, found);
            }
        }
        _ => {}
    }
}

fn collect_in_dict(dict: &Dictionary, found: &mut Vec<ObjectId>) {
    for (key, value) in dict.iter() {
        if let Object::Reference(id) = value {
            if FONT_FILE_KEYS.contains(&key.as_slice()) && !found.contains(id) {
                found.push(*id);
            }
        }
        collect_font_files(value, found);
    }
}

fn redirect(object: &mut Object, replacements: &BTreeMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(original) = replacements.get(id) {
                *id = *original;
            }
        }
        Object::Array(items) => {
            for item in items {
                redirect(item, replacements);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                redirect(value, replacements);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                redirect(value, replacements);
            }
        }
        _ => {}
    }
}

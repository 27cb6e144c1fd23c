//! Benchmark for ESON serialization using synthetic mesh data.
//!
//! Generates a triangle mesh with large vertex attribute buffers, the
//! workload the format was designed around, and compares round-trip time
//! and wire size against the equivalent JSON document.

use std::time::Instant;

use eson::{decode_document, encode_document, encode_document_into, object_size, Object, Value};
use serde::Serialize;

const VERTEX_COUNT: usize = 100_000;
const TRIANGLE_COUNT: usize = 200_000;
const ITERATIONS: u32 = 20;

// =============================================================================
// DETERMINISTIC DATA GENERATION
// =============================================================================

/// xorshift64; deterministic so runs are comparable.
struct XorShift(u64);

impl XorShift {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn next_u32_below(&mut self, bound: u32) -> u32 {
        (self.next_u64() % bound as u64) as u32
    }
}

struct Mesh {
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

fn generate_mesh() -> Mesh {
    let mut rng = XorShift(0x2545_F491_4F6C_DD1D);

    let mut positions = Vec::with_capacity(VERTEX_COUNT * 3);
    let mut normals = Vec::with_capacity(VERTEX_COUNT * 3);
    for _ in 0..VERTEX_COUNT * 3 {
        positions.push(rng.next_f32() * 100.0 - 50.0);
        normals.push(rng.next_f32() * 2.0 - 1.0);
    }

    let mut indices = Vec::with_capacity(TRIANGLE_COUNT * 3);
    for _ in 0..TRIANGLE_COUNT * 3 {
        indices.push(rng.next_u32_below(VERTEX_COUNT as u32));
    }

    Mesh {
        positions,
        normals,
        indices,
    }
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_ne_bytes());
    }
    out
}

fn u32_bytes(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_ne_bytes());
    }
    out
}

// =============================================================================
// DOCUMENT CONSTRUCTION
// =============================================================================

fn build_document<'a>(
    positions: &'a [u8],
    normals: &'a [u8],
    indices: &'a [u8],
) -> Object<'a> {
    let mut material = Object::new();
    material.insert("name".to_string(), Value::from("brushed_metal"));
    material.insert(
        "base_color".to_string(),
        Value::array(vec![
            Value::from(0.82f64),
            Value::from(0.79f64),
            Value::from(0.75f64),
        ])
        .unwrap(),
    );
    material.insert("metallic".to_string(), Value::from(0.9f64));
    material.insert("roughness".to_string(), Value::from(0.35f64));

    let mut doc = Object::new();
    doc.insert("name".to_string(), Value::from("synthetic_mesh"));
    doc.insert("vertex_count".to_string(), Value::from(VERTEX_COUNT as i64));
    doc.insert(
        "triangle_count".to_string(),
        Value::from(TRIANGLE_COUNT as i64),
    );
    doc.insert("positions".to_string(), Value::binary(positions));
    doc.insert("normals".to_string(), Value::binary(normals));
    doc.insert("indices".to_string(), Value::binary(indices));
    doc.insert("material".to_string(), Value::from(material));
    doc
}

#[derive(Serialize)]
struct JsonMaterial<'a> {
    name: &'a str,
    base_color: [f64; 3],
    metallic: f64,
    roughness: f64,
}

#[derive(Serialize)]
struct JsonMesh<'a> {
    name: &'a str,
    vertex_count: u64,
    triangle_count: u64,
    positions: &'a [f32],
    normals: &'a [f32],
    indices: &'a [u32],
    material: JsonMaterial<'a>,
}

// =============================================================================
// BENCHMARK
// =============================================================================

fn mb(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn main() {
    println!(
        "Generating mesh: {} vertices, {} triangles",
        VERTEX_COUNT, TRIANGLE_COUNT
    );
    let mesh = generate_mesh();
    let positions = f32_bytes(&mesh.positions);
    let normals = f32_bytes(&mesh.normals);
    let indices = u32_bytes(&mesh.indices);

    let doc = build_document(&positions, &normals, &indices);
    let eson_size = object_size(&doc).expect("document must be sizeable") as usize;

    // --- ESON encode into a reused, exactly sized buffer ---
    let mut buf = vec![0u8; eson_size];
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        let written = encode_document_into(&doc, &mut buf).expect("encode failed");
        assert_eq!(written, eson_size);
    }
    let encode_time = start.elapsed() / ITERATIONS;

    // --- ESON decode (zero-copy) ---
    let bytes = encode_document(&doc).expect("encode failed");
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        let decoded = decode_document(&bytes).expect("decode failed");
        assert_eq!(decoded.len(), doc.len());
    }
    let decode_time = start.elapsed() / ITERATIONS;

    // --- JSON comparison ---
    let json_mesh = JsonMesh {
        name: "synthetic_mesh",
        vertex_count: VERTEX_COUNT as u64,
        triangle_count: TRIANGLE_COUNT as u64,
        positions: &mesh.positions,
        normals: &mesh.normals,
        indices: &mesh.indices,
        material: JsonMaterial {
            name: "brushed_metal",
            base_color: [0.82, 0.79, 0.75],
            metallic: 0.9,
            roughness: 0.35,
        },
    };

    let start = Instant::now();
    let json_bytes = serde_json::to_vec(&json_mesh).expect("JSON encode failed");
    let json_encode_time = start.elapsed();

    let start = Instant::now();
    let json_value: serde_json::Value =
        serde_json::from_slice(&json_bytes).expect("JSON decode failed");
    let json_decode_time = start.elapsed();
    assert!(json_value.get("positions").is_some());

    println!("\n=== Wire size ===");
    println!("ESON: {:>10} bytes ({:.2} MiB)", eson_size, mb(eson_size));
    println!(
        "JSON: {:>10} bytes ({:.2} MiB)",
        json_bytes.len(),
        mb(json_bytes.len())
    );
    println!(
        "ratio: {:.2}x",
        json_bytes.len() as f64 / eson_size as f64
    );

    println!("\n=== ESON (mean of {} iterations) ===", ITERATIONS);
    println!(
        "encode: {:>10.3?} ({:.0} MiB/s)",
        encode_time,
        mb(eson_size) / encode_time.as_secs_f64()
    );
    println!(
        "decode: {:>10.3?} ({:.0} MiB/s)",
        decode_time,
        mb(eson_size) / decode_time.as_secs_f64()
    );

    println!("\n=== JSON (single iteration) ===");
    println!("encode: {:>10.3?}", json_encode_time);
    println!("decode: {:>10.3?}", json_decode_time);
}

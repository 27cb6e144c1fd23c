//! Simple decoder to inspect ESON files.

use std::fs;

use eson::{decode_document, Value};

fn format_scalar(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("{}", b),
        Value::Int64(i) => format!("{}", i),
        Value::Float64(f) => format!("{:.6}", f),
        Value::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.chars().count() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Value::Binary(b) => {
            let head: Vec<String> = b.iter().take(8).map(|x| format!("{:02x}", x)).collect();
            if b.len() > 8 {
                format!("BINARY[{} bytes: {} ...]", b.len(), head.join(" "))
            } else {
                format!("BINARY[{} bytes: {}]", b.len(), head.join(" "))
            }
        }
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn print_value(key: &str, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(o) => {
            println!("{}{}: object ({} entries)", pad, key, o.len());
            for (k, v) in o {
                print_value(k, v, indent + 1);
            }
        }
        Value::Array(a) => {
            println!("{}{}: array ({} elements)", pad, key, a.len());
            for (i, v) in a.iter().take(10).enumerate() {
                print_value(&format!("[{}]", i), v, indent + 1);
            }
            if a.len() > 10 {
                println!("{}  ... and {} more elements", pad, a.len() - 10);
            }
        }
        scalar => println!("{}{} = {}", pad, key, format_scalar(scalar)),
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "output.eson".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let doc = decode_document(&data).expect("Failed to decode");

    println!("\n=== Document ({} entries) ===", doc.len());
    for (key, value) in &doc {
        print_value(key, value, 0);
    }
}

//! Conversion of a trusted-setup verifying key into the verifier's
//! embedded constant table.
//!
//! Runs once per setup artifact, offline. The constant table uses
//! little-endian byte order and the same G2 pair swap as the per-request
//! packer; both paths share [`crate::field`] and [`crate::transform`] so
//! they cannot drift apart. IC entries are emitted in consumption order:
//! index 0 is the constant term, indices 1..=n the public inputs in
//! declared order. Getting that order wrong produces a verifier that
//! rejects every valid proof, silently.

use serde::{Deserialize, Serialize};

use crate::field::{encode_le, FIELD_BYTES};
use crate::pack::{g1_affine, g2_affine, PackError};
use crate::transform::swap_pair;

/// A snarkjs `verification_key.json` document.
///
/// Unknown fields (pairing precomputations and the like) are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyingKeyJson {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: Vec<String>,
    pub vk_beta_2: Vec<Vec<String>>,
    pub vk_gamma_2: Vec<Vec<String>>,
    pub vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

/// The verifier's constant table in wire byte order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKeyTable {
    pub nr_pubinputs: usize,
    pub alpha_g1: [u8; 64],
    pub beta_g2: [u8; 128],
    pub gamma_g2: [u8; 128],
    pub delta_g2: [u8; 128],
    /// One entry per public input, plus the constant term at index 0.
    pub ic: Vec<[u8; 64]>,
}

/// Convert a parsed verifying key into the constant table.
pub fn convert_verifying_key(vk: &VerifyingKeyJson) -> Result<VerifyingKeyTable, PackError> {
    if vk.protocol != "groth16" {
        return Err(PackError::UnsupportedProtocol(vk.protocol.clone()));
    }
    if vk.curve != "bn128" {
        return Err(PackError::UnsupportedCurve(vk.curve.clone()));
    }
    if vk.ic.len() != vk.n_public + 1 {
        return Err(PackError::IcLength {
            expected: vk.n_public + 1,
            got: vk.ic.len(),
        });
    }

    let mut ic = Vec::with_capacity(vk.ic.len());
    for point in &vk.ic {
        ic.push(g1_table_bytes(point, "IC")?);
    }

    Ok(VerifyingKeyTable {
        nr_pubinputs: vk.n_public,
        alpha_g1: g1_table_bytes(&vk.vk_alpha_1, "vk_alpha_1")?,
        beta_g2: g2_table_bytes(&vk.vk_beta_2, "vk_beta_2")?,
        gamma_g2: g2_table_bytes(&vk.vk_gamma_2, "vk_gamma_2")?,
        delta_g2: g2_table_bytes(&vk.vk_delta_2, "vk_delta_2")?,
        ic,
    })
}

/// G1 constant-table entry: `x || y`, each 32 bytes little-endian.
fn g1_table_bytes(coords: &[String], element: &'static str) -> Result<[u8; 64], PackError> {
    let (x, y) = g1_affine(coords, element)?;
    let mut out = [0u8; 64];
    out[..FIELD_BYTES].copy_from_slice(&encode_le(&x)?);
    out[FIELD_BYTES..].copy_from_slice(&encode_le(&y)?);
    Ok(out)
}

/// G2 constant-table entry: swapped x pair then swapped y pair,
/// each sub-coordinate 32 bytes little-endian.
fn g2_table_bytes(coords: &[Vec<String>], element: &'static str) -> Result<[u8; 128], PackError> {
    let (x, y) = g2_affine(coords, element)?;
    let [x0, x1] = swap_pair(x);
    let [y0, y1] = swap_pair(y);
    let mut out = [0u8; 128];
    out[..32].copy_from_slice(&encode_le(&x0)?);
    out[32..64].copy_from_slice(&encode_le(&x1)?);
    out[64..96].copy_from_slice(&encode_le(&y0)?);
    out[96..].copy_from_slice(&encode_le(&y1)?);
    Ok(out)
}

/// Render the constant table as a Rust source module.
///
/// The output is written into the verifier program's source tree and
/// compiled in; it carries no runtime parsing.
pub fn render_rust_module(table: &VerifyingKeyTable, source: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "//! Verifying-key constant table generated from `{source}`.\n//! Do not edit by hand; regenerate with `zkgeo-tools convert-vk`.\n\n"
    ));
    out.push_str(&format!(
        "pub const NR_PUBINPUTS: usize = {};\n\n",
        table.nr_pubinputs
    ));
    out.push_str(&format!(
        "pub const VK_ALPHA_G1: [u8; 64] = {};\n\n",
        format_bytes(&table.alpha_g1, 1)
    ));
    out.push_str(&format!(
        "pub const VK_BETA_G2: [u8; 128] = {};\n\n",
        format_bytes(&table.beta_g2, 1)
    ));
    out.push_str(&format!(
        "pub const VK_GAMMA_G2: [u8; 128] = {};\n\n",
        format_bytes(&table.gamma_g2, 1)
    ));
    out.push_str(&format!(
        "pub const VK_DELTA_G2: [u8; 128] = {};\n\n",
        format_bytes(&table.delta_g2, 1)
    ));
    out.push_str(&format!(
        "pub const VK_IC: [[u8; 64]; {}] = [\n",
        table.ic.len()
    ));
    for entry in &table.ic {
        out.push_str(&format!("    {},\n", format_bytes(entry, 2)));
    }
    out.push_str("];\n");
    out
}

fn format_bytes(bytes: &[u8], indent_level: usize) -> String {
    let indent = "    ".repeat(indent_level);
    let mut out = String::from("[\n");
    for chunk in bytes.chunks(16) {
        out.push_str(&indent);
        out.push_str("    ");
        for b in chunk {
            out.push_str(&format!("0x{b:02x}, "));
        }
        out.pop();
        out.push('\n');
    }
    out.push_str(&indent);
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g1(x: u64, y: u64) -> Vec<String> {
        vec![x.to_string(), y.to_string(), "1".to_string()]
    }

    fn g2(x0: u64, x1: u64, y0: u64, y1: u64) -> Vec<Vec<String>> {
        vec![
            vec![x0.to_string(), x1.to_string()],
            vec![y0.to_string(), y1.to_string()],
            vec!["1".to_string(), "0".to_string()],
        ]
    }

    fn sample_vk() -> VerifyingKeyJson {
        VerifyingKeyJson {
            protocol: "groth16".to_string(),
            curve: "bn128".to_string(),
            n_public: 4,
            vk_alpha_1: g1(0x0102, 0x0304),
            vk_beta_2: g2(1, 2, 3, 4),
            vk_gamma_2: g2(5, 6, 7, 8),
            vk_delta_2: g2(9, 10, 11, 12),
            ic: vec![g1(100, 101), g1(102, 103), g1(104, 105), g1(106, 107), g1(108, 109)],
        }
    }

    #[test]
    fn alpha_is_little_endian_x_then_y() {
        let table = convert_verifying_key(&sample_vk()).unwrap();
        assert_eq!(&table.alpha_g1[..2], &[0x02, 0x01]);
        assert_eq!(&table.alpha_g1[2..32], &[0u8; 30]);
        assert_eq!(&table.alpha_g1[64 - 32..64 - 30], &[0x04, 0x03]);
    }

    #[test]
    fn g2_pairs_are_swapped_in_the_table() {
        let table = convert_verifying_key(&sample_vk()).unwrap();
        // beta = ((x0=1, x1=2), (y0=3, y1=4)) stored as x1, x0, y1, y0.
        assert_eq!(table.beta_g2[0], 2);
        assert_eq!(table.beta_g2[32], 1);
        assert_eq!(table.beta_g2[64], 4);
        assert_eq!(table.beta_g2[96], 3);
    }

    #[test]
    fn ic_order_is_preserved() {
        let table = convert_verifying_key(&sample_vk()).unwrap();
        assert_eq!(table.ic.len(), 5);
        for (i, entry) in table.ic.iter().enumerate() {
            assert_eq!(entry[0] as usize, 100 + 2 * i);
            assert_eq!(entry[32] as usize, 101 + 2 * i);
        }
    }

    #[test]
    fn ic_length_mismatch_is_rejected() {
        let mut vk = sample_vk();
        vk.ic.pop();
        assert_eq!(
            convert_verifying_key(&vk).unwrap_err(),
            PackError::IcLength {
                expected: 5,
                got: 4
            }
        );
    }

    #[test]
    fn wrong_protocol_is_rejected() {
        let mut vk = sample_vk();
        vk.protocol = "plonk".to_string();
        assert!(matches!(
            convert_verifying_key(&vk),
            Err(PackError::UnsupportedProtocol(_))
        ));
        let mut vk = sample_vk();
        vk.curve = "bls12-381".to_string();
        assert!(matches!(
            convert_verifying_key(&vk),
            Err(PackError::UnsupportedCurve(_))
        ));
    }

    #[test]
    fn parses_snarkjs_json_and_ignores_extra_fields() {
        let raw = r#"{
            "protocol": "groth16",
            "curve": "bn128",
            "nPublic": 1,
            "vk_alpha_1": ["1", "2", "1"],
            "vk_beta_2": [["1", "2"], ["3", "4"], ["1", "0"]],
            "vk_gamma_2": [["1", "2"], ["3", "4"], ["1", "0"]],
            "vk_delta_2": [["1", "2"], ["3", "4"], ["1", "0"]],
            "vk_alphabeta_12": [],
            "IC": [["5", "6", "1"], ["7", "8", "1"]]
        }"#;
        let vk: VerifyingKeyJson = serde_json::from_str(raw).unwrap();
        let table = convert_verifying_key(&vk).unwrap();
        assert_eq!(table.nr_pubinputs, 1);
        assert_eq!(table.ic[1][0], 7);
    }

    #[test]
    fn rendered_module_declares_the_table() {
        let table = convert_verifying_key(&sample_vk()).unwrap();
        let source = render_rust_module(&table, "verification_key.json");
        assert!(source.contains("pub const NR_PUBINPUTS: usize = 4;"));
        assert!(source.contains("pub const VK_IC: [[u8; 64]; 5]"));
        assert!(source.contains("pub const VK_BETA_G2: [u8; 128]"));
        assert!(source.starts_with("//! Verifying-key constant table"));
    }
}

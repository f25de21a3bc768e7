/// Gives one lowercase two character hex token per byte, so that `hex_tokens(bytes)[i]` is the byte at offset `i`.
pub fn hex_tokens(bytes: &[u8]) -> Vec<String> {
	bytes.iter()
		.map(|byte| hex::encode([*byte]))
		.collect()
}

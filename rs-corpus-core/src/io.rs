use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use crate::analysis::aggregator::AggregatedFrequencyView;
use crate::analysis::ngram_table::NGramTable;
use crate::error::CorpusResult;

/// Opens a file for buffered line reading.
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<BufReader<File>> {
	Ok(BufReader::new(File::open(path)?))
}

/// Counts the lines of a stream in one pass, without keeping them.
///
/// A last line without a trailing `\n` still counts; an empty stream has 0 lines.
pub fn count_lines<R: BufRead>(mut reader: R) -> io::Result<usize> {
	let mut lines = 0;
	let mut last_byte = None;
	loop {
		let buffer = reader.fill_buf()?;
		if buffer.is_empty() {
			break;
		}
		lines += buffer.iter().filter(|&&b| b == b'\n').count();
		last_byte = buffer.last().copied();
		let consumed = buffer.len();
		reader.consume(consumed);
	}
	if matches!(last_byte, Some(b) if b != b'\n') {
		lines += 1;
	}
	Ok(lines)
}

/// Builds an output path based on an input path and a new extension.
///
/// Without `folder` the output lands beside the input.
///
/// Example:
/// `data/en_US.blogs.txt` + `"sample.txt"` → `data/en_US.blogs.sample.txt`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, folder: Option<&Path>, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = folder.unwrap_or_else(|| input_path.parent().unwrap_or_else(|| Path::new(".")));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	// `set_extension` would eat dotted stems such as "en_US.blogs"
	let mut file_name = file_stem.to_os_string();
	file_name.push(".");
	file_name.push(output_extension);

	let mut output = PathBuf::from(parent);
	output.push(file_name);

	Ok(output)
}

/// Name of the corpus source stored at `path`: its file name minus the last extension.
///
/// `corpus/en_US.twitter.txt` is the source `en_US.twitter`.
pub fn source_name<P: AsRef<Path>>(path: P) -> io::Result<String> {
	match path.as_ref().file_stem() {
		Some(stem) => Ok(stem.to_string_lossy().into_owned()),
		None => Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("{} does not name a source file", path.as_ref().display()),
		)),
	}
}

/// Corpus folder to scan. A folder made only of `.` parts (or empty) is the
/// working directory, so logs show where sources were read from.
pub fn resolve_folder(folder: &Path) -> PathBuf {
	if folder.components().all(|part| part == Component::CurDir) {
		if let Ok(cwd) = env::current_dir() {
			return cwd;
		}
	}
	folder.to_path_buf()
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns full paths. Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Writes lines to a new text file, one per line.
///
/// Used to persist the extracted sample of a source.
pub fn write_lines<P, S>(path: P, lines: &[S]) -> io::Result<()>
where
	P: AsRef<Path>,
	S: AsRef<str>,
{
	let mut writer = BufWriter::new(File::create(path)?);
	for line in lines {
		writer.write_all(line.as_ref().as_bytes())?;
		writer.write_all(b"\n")?;
	}
	writer.flush()
}

/// Saves a table as a compact postcard snapshot.
pub fn save_table<P: AsRef<Path>>(path: P, table: &NGramTable) -> CorpusResult<()> {
	let bytes = postcard::to_stdvec(table)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Loads a table saved by `save_table`.
pub fn load_table<P: AsRef<Path>>(path: P) -> CorpusResult<NGramTable> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

/// Writes a joined view as CSV: header `ngram,<source...>`, rows sorted by total count.
pub fn write_view_csv<W: Write>(writer: W, view: &AggregatedFrequencyView) -> CorpusResult<()> {
	let mut csv_writer = csv::Writer::from_writer(writer);

	let mut header = vec!["ngram".to_owned()];
	header.extend(view.sources().iter().cloned());
	csv_writer.write_record(&header)?;

	for (ngram, counts) in view.sorted_rows() {
		let mut record = vec![ngram.to_owned()];
		record.extend(view.sources().iter().map(|s| counts.get(s).copied().unwrap_or(0).to_string()));
		csv_writer.write_record(&record)?;
	}

	csv_writer.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn count_lines_handles_missing_trailing_newline() {
		assert_eq!(count_lines("a\nb\nc".as_bytes()).unwrap(), 3);
		assert_eq!(count_lines("a\nb\nc\n".as_bytes()).unwrap(), 3);
		assert_eq!(count_lines("".as_bytes()).unwrap(), 0);
		assert_eq!(count_lines("\n\n".as_bytes()).unwrap(), 2);
	}

	#[test]
	fn output_path_swaps_extension() {
		let out = build_output_path("data/en_US.blogs.txt", None, "sample.txt").unwrap();
		assert_eq!(out, PathBuf::from("data/en_US.blogs.sample.txt"));

		let out = build_output_path("data/news.txt", Some(Path::new("out")), "bin").unwrap();
		assert_eq!(out, PathBuf::from("out/news.bin"));
	}

	#[test]
	fn source_name_keeps_inner_dots() {
		assert_eq!(source_name("./data/en_US.news.txt").unwrap(), "en_US.news");
		assert_eq!(source_name("twitter.txt").unwrap(), "twitter");
		assert!(source_name("data/..").is_err());
	}

	#[test]
	fn resolve_folder_expands_current_dir_only() {
		let cwd = env::current_dir().unwrap();
		assert_eq!(resolve_folder(Path::new(".")), cwd);
		assert_eq!(resolve_folder(Path::new("./")), cwd);
		assert_eq!(resolve_folder(Path::new("corpus")), PathBuf::from("corpus"));
		assert_eq!(resolve_folder(Path::new("./corpus")), PathBuf::from("./corpus"));
	}
}

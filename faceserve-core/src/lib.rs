/// faceserve-core: the quiet caretaker of your font library
///
/// This library keeps a live index of every font file under a set of watched
/// directories and answers the questions a web font server needs answered:
/// what fonts exist, what they call themselves, how heavy they are in CSS
/// terms, and what public name they should be served under.
///
/// ## Three Responsibilities
///
/// **Extraction**: Reading a font's papers at the border
/// - Sniffs the binary container (TrueType, OpenType, WOFF) by magic bytes
/// - Pulls family, subfamily, full name, and copyright from the name table
/// - Inflates WOFF payloads back into plain sfnt data before reading
///
/// **Indexing**: Keeping the catalog current without closing the library
/// - One record per file path, with lookup views by identifier, full name,
///   and family-name prefix
/// - Concurrent readers never block each other; every mutation is atomic
///   across all views
/// - A generation counter tells downstream caches when their world changed
///
/// **Synthesis**: Writing the `@font-face` card for each font
/// - CSS weight inferred from naming conventions (subfamily first, then the
///   tail of the full name)
/// - Public identifiers either obfuscated (SHA-256) or plain, per-family
///   configurable
///
/// ## A Sample Conversation
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use std::sync::Arc;
/// use faceserve_core::config::Config;
/// use faceserve_core::index::FontIndex;
/// use faceserve_core::pipeline::Indexer;
///
/// let config = Arc::new(Config::default());
/// let index = Arc::new(FontIndex::new());
/// let indexer = Indexer::new(Arc::clone(&index), config);
///
/// // Fill the index once, then keep it fresh while the guard lives.
/// let roots = vec![PathBuf::from("/usr/share/fonts")];
/// indexer.bulk_load(&roots)?;
/// let _watcher = indexer.watch(&roots)?;
///
/// if let Some(font) = index.find_by_full_name("Acme Sans SemiBold") {
///     println!("{}", faceserve_core::css::font_face_css(&font));
/// }
/// #
/// # Ok::<(), anyhow::Error>(())
/// ```
pub mod config;
pub mod css;
pub mod discovery;
pub mod extract;
pub mod identity;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod weight;

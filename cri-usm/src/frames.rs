//! Lazy per-frame reads from a shared container source.
//!
//! A [`FrameIndex`] lists where each packet of one stream lives. The frame
//! iterators seek and read one packet per call to `next`, holding the source
//! lock only around that seek and read. Several iterators, possibly on other
//! threads, can therefore share one source through the same mutex.
//!
//! ```
//! use cri_usm::frames::{FrameIndex, FrameSequencer};
//! use std::{
//!     io::Cursor,
//!     sync::{Arc, Mutex},
//! };
//!
//! let source = Arc::new(Mutex::new(Cursor::new(b"aabbbcccc".to_vec())));
//! let index = FrameIndex::new(vec![(0, 2), (2, 3), (5, 4)]).with_keyframes([0, 2]);
//!
//! let frames = FrameSequencer::video(source, &index)
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! assert_eq!(frames[1], (b"bbb".to_vec(), false));
//! assert_eq!(frames[2], (b"cccc".to_vec(), true));
//! ```

use crate::{Error, Result, chunk::ChunkSignature, demux::scan_streams};
use std::{
    collections::HashSet,
    io::{self, Read, Seek, SeekFrom},
    sync::{Arc, Mutex},
    vec,
};

/// Offsets and sizes of the packets of one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameIndex {
    pub entries: Vec<(u64, usize)>,
    pub keyframes: HashSet<usize>,
}

impl FrameIndex {
    pub fn new(entries: Vec<(u64, usize)>) -> Self {
        Self {
            entries,
            keyframes: HashSet::new(),
        }
    }

    /// Mark the frames at these positions as keyframes.
    pub fn with_keyframes<I: IntoIterator<Item = usize>>(mut self, keyframes: I) -> Self {
        self.keyframes.extend(keyframes);
        self
    }

    /// Index the stream packets of one `signature` / `channel` stream.
    ///
    /// Keyframes are not known from chunk headers alone and are left empty.
    pub fn scan<R: Read + Seek>(reader: R, signature: ChunkSignature, channel: u8) -> Result<Self> {
        Ok(scan_streams(reader)?
            .into_iter()
            .find(|x| x.signature == signature && x.channel == channel)
            .map(|x| x.packets)
            .unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_keyframe(&self, position: usize) -> bool {
        self.keyframes.contains(&position)
    }
}

/// Reads frames one by one from a source shared behind a mutex.
pub struct FrameSequencer<R> {
    source: Arc<Mutex<R>>,
    entries: vec::IntoIter<(u64, usize)>,
    position: usize,
}

impl<R: Read + Seek> FrameSequencer<R> {
    pub fn new(source: Arc<Mutex<R>>, index: &FrameIndex) -> Self {
        Self {
            source,
            entries: index.entries.clone().into_iter(),
            position: 0,
        }
    }

    /// Video frames paired with whether they are keyframes.
    pub fn video(source: Arc<Mutex<R>>, index: &FrameIndex) -> VideoFrames<R> {
        VideoFrames {
            inner: Self::new(source, index),
            keyframes: index.keyframes.clone(),
        }
    }

    /// Audio frames. Keyframes of `index` are ignored.
    pub fn audio(source: Arc<Mutex<R>>, index: &FrameIndex) -> AudioFrames<R> {
        AudioFrames {
            inner: Self::new(source, index),
        }
    }

    fn read_at(&self, offset: u64, size: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0; size];
        let mut source = self
            .source
            .lock()
            .map_err(|_| Error::Io(io::Error::other("frame source lock is poisoned")))?;

        source.seek(SeekFrom::Start(offset))?;
        source.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<R: Read + Seek> Iterator for FrameSequencer<R> {
    /// Position of the frame in its index and its bytes.
    type Item = Result<(usize, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, size) = self.entries.next()?;
        let position = self.position;
        self.position += 1;
        Some(self.read_at(offset, size).map(|data| (position, data)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<R: Read + Seek> ExactSizeIterator for FrameSequencer<R> {}

/// Iterator returned by [`FrameSequencer::video`].
pub struct VideoFrames<R> {
    inner: FrameSequencer<R>,
    keyframes: HashSet<usize>,
}

impl<R: Read + Seek> Iterator for VideoFrames<R> {
    type Item = Result<(Vec<u8>, bool)>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(
            self.inner
                .next()?
                .map(|(position, data)| (data, self.keyframes.contains(&position))),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator returned by [`FrameSequencer::audio`].
pub struct AudioFrames<R> {
    inner: FrameSequencer<R>,
}

impl<R: Read + Seek> Iterator for AudioFrames<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map(|(_, data)| data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

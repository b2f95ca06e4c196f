mod ffmpeg_loader;

pub(crate) use ffmpeg_loader::FfmpegLoader;

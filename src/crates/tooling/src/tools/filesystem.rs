//! Filesystem tools

/// File read tool
pub struct FileReadTool;

/// File write tool
pub struct FileWriteTool;

/// Filesystem list tool
pub struct FsListTool;

/// File copy tool
pub struct FsCopyTool;

/// File move tool
pub struct FsMoveTool;

/// File delete tool
pub struct FsDeleteTool;

/// File patch tool
pub struct FilePatchTool;

/// Grep tool
pub struct GrepTool;

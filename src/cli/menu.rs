// Interactive numbered menu over the file manager. Input is read line by line
// so any async buffered reader can drive it; end of input exits the loop.

use crate::services::file_manager::FileManager;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

const MENU: &str = "\n📦 S3 Bucket Tools
1. List objects
2. Upload one-line text input to a file
3. Delete an object
4. Read and print .txt or .pdf
5. Upload any file (PDF, DOCX, etc.)
6. Type and upload a full report
7. Exit";

pub struct Menu<'a, R, W> {
    manager: &'a FileManager,
    lines: Lines<R>,
    output: W,
}

impl<'a, R, W> Menu<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(manager: &'a FileManager, input: R, output: W) -> Self {
        Self {
            manager,
            lines: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the exit choice or end of input. Operation failures are
    /// printed and the loop continues; only terminal I/O errors are returned.
    pub async fn run(&mut self, bucket: Option<String>) -> io::Result<()> {
        let bucket = match bucket {
            Some(bucket) => bucket.trim().to_string(),
            None => match self.prompt("Enter your S3 bucket name: ").await? {
                Some(bucket) => bucket.trim().to_string(),
                None => return Ok(()),
            },
        };

        loop {
            self.say(MENU).await?;
            let Some(choice) = self.prompt("Enter your choice (1–7): ").await? else {
                break;
            };

            let keep_going = match choice.trim() {
                "1" => self.list(&bucket).await?,
                "2" => self.upload_text(&bucket).await?,
                "3" => self.delete(&bucket).await?,
                "4" => self.preview(&bucket).await?,
                "5" => self.upload_file(&bucket).await?,
                "6" => self.upload_report(&bucket).await?,
                "7" => {
                    self.say("👋 Exiting. Goodbye!").await?;
                    false
                }
                _ => {
                    self.say("❌ Invalid choice.").await?;
                    true
                }
            };

            if !keep_going {
                break;
            }
        }

        Ok(())
    }

    async fn list(&mut self, bucket: &str) -> io::Result<bool> {
        let manager = self.manager;
        match manager.list_files(bucket).await {
            Ok(keys) if keys.is_empty() => self.say("No files found in the bucket.").await?,
            Ok(keys) => {
                for key in keys {
                    self.say(&format!("📄 {key}")).await?;
                }
            }
            Err(e) => self.say(&format!("❌ List failed: {e}")).await?,
        }
        Ok(true)
    }

    async fn upload_text(&mut self, bucket: &str) -> io::Result<bool> {
        let manager = self.manager;
        let Some(key) = self
            .prompt("Enter filename to save text as (e.g., notes.txt): ")
            .await?
        else {
            return Ok(false);
        };
        let Some(text) = self.prompt("Enter text to upload to S3: ").await? else {
            return Ok(false);
        };

        match manager.upload_text(bucket, &key, &text).await {
            Ok(()) => self.say(&format!("✅ Uploaded text to '{}'", key.trim())).await?,
            Err(e) => self.say(&format!("❌ Upload failed: {e}")).await?,
        }
        Ok(true)
    }

    async fn delete(&mut self, bucket: &str) -> io::Result<bool> {
        let manager = self.manager;
        let Some(key) = self.prompt("Enter object key to delete: ").await? else {
            return Ok(false);
        };

        match manager.delete_file(bucket, &key).await {
            Ok(()) => {
                self.say(&format!("🗑️ Deleted '{}' from '{}'", key.trim(), bucket))
                    .await?
            }
            Err(e) => self.say(&format!("❌ Delete failed: {e}")).await?,
        }
        Ok(true)
    }

    async fn preview(&mut self, bucket: &str) -> io::Result<bool> {
        let manager = self.manager;
        let Some(key) = self
            .prompt("Enter .txt or .pdf filename to download and read: ")
            .await?
        else {
            return Ok(false);
        };

        match manager.download_and_preview(bucket, &key).await {
            Ok(preview) => self.say(&preview.into_text()).await?,
            Err(e) => self.say(&format!("❌ Error during file preview: {e}")).await?,
        }
        Ok(true)
    }

    async fn upload_file(&mut self, bucket: &str) -> io::Result<bool> {
        let manager = self.manager;
        let Some(file_path) = self.prompt("Enter full path to your file: ").await? else {
            return Ok(false);
        };
        let Some(key) = self
            .prompt("Enter S3 filename (leave blank to use original name): ")
            .await?
        else {
            return Ok(false);
        };

        match manager
            .upload_file(bucket, &file_path, Some(key.as_str()))
            .await
        {
            Ok(key) => {
                self.say(&format!("✅ Uploaded '{}' as '{}'", file_path.trim(), key))
                    .await?
            }
            Err(e) => self.say(&format!("❌ Upload failed: {e}")).await?,
        }
        Ok(true)
    }

    async fn upload_report(&mut self, bucket: &str) -> io::Result<bool> {
        let manager = self.manager;
        let Some(key) = self
            .prompt("Enter S3 filename for your report (e.g., my_report.txt): ")
            .await?
        else {
            return Ok(false);
        };

        self.say("📝 Type your report below. Press ENTER twice to finish.")
            .await?;
        let mut report = Vec::new();
        while let Some(line) = self.lines.next_line().await? {
            if line.is_empty() {
                break;
            }
            report.push(line);
        }

        match manager.upload_report(bucket, &key, &report).await {
            Ok(()) => self.say(&format!("✅ Report uploaded as '{}'", key.trim())).await?,
            Err(e) => self.say(&format!("❌ Upload failed: {e}")).await?,
        }
        Ok(true)
    }

    /// Writes `text` without a newline and reads one line; `None` at end of input.
    async fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        self.lines.next_line().await
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}

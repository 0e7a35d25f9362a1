use std::io;

use heic_to_image::cli::process_args;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let archive_path = process_args(args)?;
    log::info!("程式執行完成，輸出壓縮檔：{}", archive_path);
    println!("轉換完成！ZIP 檔案位於：{}", archive_path);
    Ok(())
}

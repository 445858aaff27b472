//! 最小HTTP/1.1编解码
//!
//! 每个连接只处理一个请求，响应后关闭连接。请求体只支持
//! `Content-Length`，不支持分块传输。

use serde::Serialize;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// 单行（请求行或头部）最大字节数
const MAX_LINE_BYTES: u64 = 8 * 1024;

/// 最多接受的头部数量
const MAX_HEADERS: usize = 64;

/// 已解析的请求
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    /// 不含查询字符串的路径
    pub path: String,
    pub body: Vec<u8>,
}

/// 响应状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    RequestTimeout,
    PayloadTooLarge,
    InternalServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::RequestTimeout => 408,
            Status::PayloadTooLarge => 413,
            Status::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Created => "Created",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::RequestTimeout => "Request Timeout",
            Status::PayloadTooLarge => "Payload Too Large",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

/// JSON响应
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json<T: Serialize + ?Sized>(status: Status, value: &T) -> Result<Self, HttpError> {
        let body = serde_json::to_vec(value)
            .map_err(|e| HttpError::Internal(format!("failed to encode response: {e}")))?;
        Ok(Self { status, body })
    }

    pub fn error(status: Status, message: &str) -> Self {
        let body = serde_json::json!({ "message": message })
            .to_string()
            .into_bytes();
        Self { status, body }
    }
}

/// 请求处理错误，每种对应一个状态码
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method {0} is not allowed for this resource")]
    MethodNotAllowed(String),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Request was not received in time")]
    Timeout,

    #[error("{0}")]
    Internal(String),

    /// 对端在发送请求行之前关闭了连接
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HttpError {
    pub fn status(&self) -> Status {
        match self {
            HttpError::BadRequest(_) => Status::BadRequest,
            HttpError::NotFound(_) => Status::NotFound,
            HttpError::MethodNotAllowed(_) => Status::MethodNotAllowed,
            HttpError::PayloadTooLarge(_) => Status::PayloadTooLarge,
            HttpError::Timeout => Status::RequestTimeout,
            HttpError::Internal(_) | HttpError::ConnectionClosed | HttpError::Io(_) => {
                Status::InternalServerError
            }
        }
    }

    pub fn into_response(self) -> Response {
        Response::error(self.status(), &self.to_string())
    }
}

/// 读取一行并去掉行尾的 CRLF
///
/// 返回 `None` 表示读到EOF。
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = match (&mut *reader).take(MAX_LINE_BYTES).read_line(&mut line).await {
        Ok(n) => n,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(HttpError::BadRequest("request is not valid UTF-8".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    if n == 0 {
        return Ok(None);
    }
    if !line.ends_with('\n') {
        return Err(HttpError::BadRequest(
            "request line or header is too long or truncated".to_string(),
        ));
    }

    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// 从流中读取一个完整请求
pub async fn read_request<R>(reader: &mut R, max_body_bytes: usize) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = read_line(reader).await?.ok_or(HttpError::ConnectionClosed)?;

    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(method), Some(target), Some(version), None) => (method, target, version),
        _ => {
            return Err(HttpError::BadRequest(format!(
                "malformed request line: {request_line}"
            )))
        }
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::BadRequest(format!(
            "unsupported protocol version: {version}"
        )));
    }

    let path = target.split('?').next().unwrap_or_default().to_string();
    let method = method.to_string();

    let mut content_length = 0usize;
    let mut headers = 0usize;
    loop {
        let line = read_line(reader)
            .await?
            .ok_or_else(|| HttpError::BadRequest("connection closed inside headers".to_string()))?;
        if line.is_empty() {
            break;
        }

        headers += 1;
        if headers > MAX_HEADERS {
            return Err(HttpError::BadRequest("too many headers".to_string()));
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::BadRequest(format!("malformed header: {line}")))?;
        let value = value.trim();

        if name.eq_ignore_ascii_case("content-length") {
            content_length = value
                .parse()
                .map_err(|_| HttpError::BadRequest(format!("invalid Content-Length: {value}")))?;
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            return Err(HttpError::BadRequest(
                "Transfer-Encoding is not supported".to_string(),
            ));
        }
    }

    if content_length > max_body_bytes {
        return Err(HttpError::PayloadTooLarge(max_body_bytes));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            HttpError::BadRequest("request body is shorter than Content-Length".to_string())
        } else {
            HttpError::Io(e)
        }
    })?;

    Ok(Request { method, path, body })
}

/// 写出响应
pub async fn write_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status.code(),
        response.status.reason(),
        response.body.len()
    );

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(&response.body).await?;
    writer.flush().await
}

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::{Shutdown, TcpStream};
use std::ops::{Deref, DerefMut};

use tracing::debug;

/// A resource with an explicit, fallible close step.
pub trait Closeable {
    /// Release the resource, flushing whatever must reach the other side.
    fn close(&mut self) -> io::Result<()>;

    /// Short description used when logging close failures.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl Closeable for File {
    fn close(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl<W: Write> Closeable for BufWriter<W> {
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Closeable for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }

    fn describe(&self) -> String {
        match self.peer_addr() {
            Ok(addr) => format!("TcpStream({addr})"),
            Err(_) => "TcpStream".to_string(),
        }
    }
}

/// An absent resource closes trivially.
impl<C: Closeable> Closeable for Option<C> {
    fn close(&mut self) -> io::Result<()> {
        match self {
            Some(inner) => inner.close(),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Some(inner) => inner.describe(),
            None => "None".to_string(),
        }
    }
}

impl<C: Closeable + ?Sized> Closeable for &mut C {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<C: Closeable + ?Sized> Closeable for Box<C> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Close `resource`, logging any failure at debug level instead of returning
/// it. Only for error paths where a failure is already being reported.
pub fn close_quietly<C: Closeable + ?Sized>(resource: &mut C) {
    if let Err(err) = resource.close() {
        debug!(resource = %resource.describe(), error = %err, "error while closing");
    }
}

/// Close every resource, ignoring (and logging) failures.
pub fn cleanup<I>(resources: I)
where
    I: IntoIterator,
    I::Item: Closeable,
{
    for mut resource in resources {
        close_quietly(&mut resource);
    }
}

/// Owns a resource and closes it quietly when dropped.
///
/// Call [`close`](Self::close) on the success path to observe the close
/// result, or [`into_inner`](Self::into_inner) to take the resource back.
#[derive(Debug)]
pub struct CloseGuard<C: Closeable> {
    resource: Option<C>,
}

impl<C: Closeable> CloseGuard<C> {
    pub fn new(resource: C) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// Close now and report the outcome.
    pub fn close(mut self) -> io::Result<()> {
        match self.resource.take() {
            Some(mut resource) => resource.close(),
            None => Ok(()),
        }
    }

    /// Disarm the guard and return the resource without closing it.
    pub fn into_inner(mut self) -> Option<C> {
        self.resource.take()
    }
}

impl<C: Closeable> Deref for CloseGuard<C> {
    type Target = Option<C>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

impl<C: Closeable> DerefMut for CloseGuard<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resource
    }
}

impl<C: Closeable> Drop for CloseGuard<C> {
    fn drop(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            close_quietly(&mut resource);
        }
    }
}
